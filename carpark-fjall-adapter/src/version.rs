use cargo_toml::{Dependency, Manifest};

/// Version of the fjall engine this adapter is built against, read from the
/// adapter's own manifest.
pub(crate) fn fjall_version() -> Result<String, String> {
    fjall_version_from(include_str!("../Cargo.toml"))
}

fn fjall_version_from(manifest: &str) -> Result<String, String> {
    let manifest = Manifest::from_str(manifest)
        .map_err(|e| format!("Failed to parse Cargo.toml: {}", e))?;

    let dependency = manifest
        .dependencies
        .get("fjall")
        .ok_or_else(|| "fjall dependency not found in Cargo.toml".to_string())?;

    match dependency {
        Dependency::Simple(version) => Ok(version.clone()),
        Dependency::Detailed(detail) => detail
            .version
            .clone()
            .ok_or_else(|| "fjall dependency version not specified".to_string()),
        Dependency::Inherited(_) => Err("Inherited fjall dependency not supported".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_own_manifest() {
        let version = fjall_version().unwrap();
        assert!(version.starts_with('2'));
    }

    #[test]
    fn test_simple_dependency() {
        let manifest = r#"
        [package]
        name = "carpark_fjall_adapter"
        version = "0.1.0"

        [dependencies]
        fjall = "2.6.3"
        "#;
        assert_eq!(fjall_version_from(manifest), Ok("2.6.3".to_string()));
    }

    #[test]
    fn test_detailed_dependency() {
        let manifest = r#"
        [package]
        name = "carpark_fjall_adapter"
        version = "0.1.0"

        [dependencies]
        fjall = { version = "2.7.0", features = ["bytes"] }
        "#;
        assert_eq!(fjall_version_from(manifest), Ok("2.7.0".to_string()));
    }

    #[test]
    fn test_missing_dependency() {
        let manifest = r#"
        [package]
        name = "carpark_fjall_adapter"
        version = "0.1.0"

        [dependencies]
        log = "0.4"
        "#;
        assert!(fjall_version_from(manifest).is_err());
    }
}
