use std::fmt;
use thiserror::Error;


#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Username(pub String);


#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsernameError {
    #[error("username cannot be blank")]
    Blank,

    #[error("username contains a control character")]
    ControlChar,
}


impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}


impl Username {
    /// Surrounding whitespace is dropped; anything else printable is kept as typed.
    pub fn parse(s: &str) -> Option<Self> {
        Self::try_from(s).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}


impl TryFrom<&str> for Username {
    type Error = UsernameError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let s = s.trim();
        if s.is_empty() { return Err(UsernameError::Blank); }
        if s.chars().any(char::is_control) {
            return Err(UsernameError::ControlChar);
        }
        Ok(Self(s.to_string()))
    }
}


impl AsRef<str> for Username {
    fn as_ref(&self) -> &str { &self.0 }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(Username::parse("  alice \t").unwrap().as_str(), "alice");
    }

    #[test]
    fn rejects_blank() {
        assert_eq!(Username::try_from("   "), Err(UsernameError::Blank));
        assert!(Username::parse("").is_none());
    }

    #[test]
    fn rejects_control_chars() {
        assert_eq!(Username::try_from("al\u{7}ice"), Err(UsernameError::ControlChar));
    }

    #[test]
    fn keeps_case_and_inner_punctuation() {
        let u = Username::parse("Dark_Knight-42").unwrap();
        assert_eq!(u.to_string(), "Dark_Knight-42");
    }
}
