use crate::utils::error::{ReproError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ReproError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 環境名稱必須在 provisioning 工具的 namespace 中唯一且可作為路徑元件
pub fn validate_identifier(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;

    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(ReproError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Only ASCII letters, digits, '-', '_' and '.' are allowed".to_string(),
        });
    }

    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ReproError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ReproError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| ReproError::MissingConfigError {
        field: field_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("environment.name", "paper-repro").is_ok());
        assert!(validate_identifier("environment.name", "repro_v1.2").is_ok());
        assert!(validate_identifier("environment.name", "").is_err());
        assert!(validate_identifier("environment.name", "has spaces").is_err());
        assert!(validate_identifier("environment.name", "slash/name").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("runner.workdir", ".").is_ok());
        assert!(validate_path("runner.workdir", "").is_err());
        assert!(validate_path("runner.workdir", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some(3usize);
        let absent: Option<usize> = None;
        assert_eq!(*validate_required_field("tiers", &present).unwrap(), 3);
        assert!(validate_required_field("tiers", &absent).is_err());
    }
}
