/// Value type of a [`SettingInfo`]; configuration UIs pick their editor from it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SettingType {
    Boolean,
    Integer,
    Float,
    String,
    Path,
}

/// Static description of one per-device setting.
///
/// Defaults and limits are stored as strings so a single table can describe settings of every
/// type; the typed accessors parse them and fall back to a neutral value when absent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SettingInfo {
    pub ty: SettingType,
    pub key: &'static str,
    pub visible_name: &'static str,
    pub description: &'static str,
    pub default_value: Option<&'static str>,
    pub min_value: Option<&'static str>,
    pub max_value: Option<&'static str>,
    pub step_value: Option<&'static str>,
}

impl SettingInfo {
    pub fn string_default_value(&self) -> &'static str {
        self.default_value.unwrap_or("")
    }

    pub fn boolean_default_value(&self) -> bool {
        self.default_value
            .and_then(crate::parse_bool)
            .unwrap_or(false)
    }

    pub fn integer_default_value(&self) -> i32 {
        parse_or(self.default_value, 0)
    }

    pub fn integer_min_value(&self) -> i32 {
        parse_or(self.min_value, i32::MIN)
    }

    pub fn integer_max_value(&self) -> i32 {
        parse_or(self.max_value, i32::MAX)
    }

    pub fn integer_step_value(&self) -> i32 {
        parse_or(self.step_value, 1)
    }

    pub fn float_default_value(&self) -> f32 {
        parse_or(self.default_value, 0.0)
    }

    pub fn float_min_value(&self) -> f32 {
        parse_or(self.min_value, f32::MIN)
    }

    pub fn float_max_value(&self) -> f32 {
        parse_or(self.max_value, f32::MAX)
    }

    pub fn float_step_value(&self) -> f32 {
        parse_or(self.step_value, 0.1)
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<&str>, fallback: T) -> T {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCALE: SettingInfo = SettingInfo {
        ty: SettingType::Float,
        key: "Scale",
        visible_name: "Scale",
        description: "",
        default_value: Some("1.0"),
        min_value: Some("0.01"),
        max_value: None,
        step_value: None,
    };

    #[test]
    fn typed_accessors_parse_limits() {
        assert_eq!(SCALE.float_default_value(), 1.0);
        assert_eq!(SCALE.float_min_value(), 0.01);
        assert_eq!(SCALE.float_max_value(), f32::MAX);
        assert_eq!(SCALE.float_step_value(), 0.1);
        assert_eq!(SCALE.integer_step_value(), 1);
        assert_eq!(SCALE.string_default_value(), "1.0");
    }

    #[test]
    fn boolean_default_parses_string() {
        let info = SettingInfo {
            ty: SettingType::Boolean,
            default_value: Some("true"),
            ..SCALE
        };
        assert!(info.boolean_default_value());
        assert!(!SettingInfo {
            default_value: None,
            ..info
        }
        .boolean_default_value());
    }
}
