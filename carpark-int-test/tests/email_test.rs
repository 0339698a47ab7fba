use carpark::model::{
    EmailStatus, EmailUpdate, Period, RecipientCount, ScheduledEmailStatus, ScheduledEmailUpdate,
};
use carpark_int_test::test_util::{
    cleanup, create_test_context, fake_email, fake_guests, fake_scheduled_email, run_test,
};

#[ctor::ctor]
fn init() {
    colog::init();
}

#[test]
fn test_email_log() {
    run_test(
        create_test_context,
        |ctx| {
            let manager = ctx.manager();
            let first = manager.add_email(fake_email(&["a@hotel.test", "b@hotel.test"]))?;
            let second = manager.add_email(fake_email(&["c@hotel.test"]))?;
            assert_eq!(first.status, EmailStatus::Sent);
            assert_eq!(manager.get_emails()?, vec![first.clone(), second.clone()]);

            let failed = manager
                .update_email(
                    &second.id,
                    EmailUpdate {
                        status: Some(EmailStatus::Failed),
                        ..EmailUpdate::default()
                    },
                )?
                .expect("email should exist");
            assert_eq!(failed.status, EmailStatus::Failed);
            assert_eq!(failed.sent_at, second.sent_at);
            assert_eq!(manager.get_email_by_id(&second.id)?, Some(failed));

            assert!(manager.delete_email(&first.id)?);
            assert!(manager.get_email_by_id(&first.id)?.is_none());
            assert_eq!(manager.get_emails()?.len(), 1);
            Ok(())
        },
        cleanup,
    );
}

#[test]
fn test_scheduled_email_lifecycle() {
    run_test(
        create_test_context,
        |ctx| {
            let manager = ctx.manager();
            let reminder = manager.add_scheduled_email(fake_scheduled_email(
                &["guest@hotel.test"],
                "2030-05-02T09:00",
            ))?;
            let notice = manager.add_scheduled_email(fake_scheduled_email(
                &["other@hotel.test"],
                "2030-05-03T09:00",
            ))?;
            assert_eq!(reminder.status, ScheduledEmailStatus::Pending);
            assert_eq!(reminder.scheduled_for.as_deref(), Some("2030-05-02T09:00"));
            assert_eq!(manager.get_stats()?.scheduled_emails, 2);

            manager.update_scheduled_email(&reminder.id, ScheduledEmailUpdate::status("sent"))?;
            manager.update_scheduled_email(
                &notice.id,
                ScheduledEmailUpdate::status(ScheduledEmailStatus::Cancelled),
            )?;
            assert_eq!(manager.get_stats()?.scheduled_emails, 0);

            let stored = manager
                .get_scheduled_email_by_id(&reminder.id)?
                .expect("scheduled e-mail should exist");
            assert_eq!(stored.status, ScheduledEmailStatus::Sent);
            assert_eq!(stored.created_at, reminder.created_at);

            assert!(manager.delete_scheduled_email(&notice.id)?);
            assert!(!manager.delete_scheduled_email(&notice.id)?);
            assert_eq!(manager.get_scheduled_emails()?, vec![stored]);
            Ok(())
        },
        cleanup,
    );
}

#[test]
fn test_analytics_for_recent_activity() {
    run_test(
        create_test_context,
        |ctx| {
            let manager = ctx.manager();
            for guest in fake_guests(3) {
                manager.add_guest(guest)?;
            }
            manager.add_email(fake_email(&["a@hotel.test", "b@hotel.test"]))?;
            manager.add_email(fake_email(&["b@hotel.test"]))?;
            manager.add_email(fake_email(&["c@hotel.test", "b@hotel.test", "a@hotel.test"]))?;

            for period in [Period::Day, Period::Week, Period::Month] {
                let analytics = manager.get_analytics(period)?;
                assert_eq!(analytics.period, period);
                assert_eq!(analytics.new_guests, 3);
                assert_eq!(analytics.emails_sent, 3);
                assert!(analytics.average_per_day > 0.0);
                assert_eq!(
                    analytics.top_recipients,
                    vec![
                        RecipientCount { email: "b@hotel.test".into(), count: 3 },
                        RecipientCount { email: "a@hotel.test".into(), count: 2 },
                        RecipientCount { email: "c@hotel.test".into(), count: 1 },
                    ]
                );
            }

            let week = manager.get_analytics("week".parse()?)?;
            assert_eq!(week.average_per_day, 3.0 / 7.0);

            let json = serde_json::to_value(&week)?;
            assert_eq!(json["period"], "week");
            assert_eq!(json["newGuests"], 3);
            assert_eq!(json["topRecipients"][0]["email"], "b@hotel.test");
            Ok(())
        },
        cleanup,
    );
}

#[test]
fn test_unknown_period_is_rejected() {
    assert!("fortnight".parse::<Period>().is_err());
    assert_eq!(" MONTH ".parse::<Period>().unwrap(), Period::Month);
}
