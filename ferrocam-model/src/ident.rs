use std::{cmp::Ordering, convert::Infallible, fmt, str::FromStr};

/// Identifier for cameras and image formats.
///
/// Devices report either numeric or symbolic ids. Canonical decimal text
/// (digits only, no leading zero) is normalized to [`Ident::Number`], so
/// `"0"` from a query string and `0` from a JSON body name the same camera
/// while `"042"` stays a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ident {
    Number(u64),
    Name(String),
}

impl Ident {
    fn normalize(raw: String) -> Self {
        let canonical = raw == "0"
            || (!raw.starts_with('0')
                && !raw.is_empty()
                && raw.bytes().all(|b| b.is_ascii_digit()));
        if canonical && let Ok(n) = raw.parse::<u64>() {
            return Ident::Number(n);
        }
        Ident::Name(raw)
    }
}

// Numbers sort before names so registry order matches ascending device index.
impl Ord for Ident {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Ident::Number(a), Ident::Number(b)) => a.cmp(b),
            (Ident::Number(_), Ident::Name(_)) => Ordering::Less,
            (Ident::Name(_), Ident::Number(_)) => Ordering::Greater,
            (Ident::Name(a), Ident::Name(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Ident {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ident::Number(n) => write!(f, "{n}"),
            Ident::Name(name) => f.write_str(name),
        }
    }
}

impl FromStr for Ident {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Ident::normalize(s.to_string()))
    }
}

impl From<u64> for Ident {
    fn from(value: u64) -> Self {
        Ident::Number(value)
    }
}

impl From<u32> for Ident {
    fn from(value: u32) -> Self {
        Ident::Number(u64::from(value))
    }
}

impl From<&str> for Ident {
    fn from(value: &str) -> Self {
        Ident::normalize(value.to_string())
    }
}

impl From<String> for Ident {
    fn from(value: String) -> Self {
        Ident::normalize(value)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::Ident;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawIdent {
        Number(u64),
        Signed(i64),
        Float(f64),
        Text(String),
    }

    // Largest integer an f64 holds exactly.
    const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

    fn is_whole_index(x: f64) -> bool {
        x.fract() == 0.0 && (0.0..=MAX_EXACT_FLOAT).contains(&x)
    }

    impl Serialize for Ident {
        fn serialize<S: Serializer>(
            &self,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match self {
                Ident::Number(n) => serializer.serialize_u64(*n),
                Ident::Name(name) => serializer.serialize_str(name),
            }
        }
    }

    impl<'de> Deserialize<'de> for Ident {
        fn deserialize<D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Self, D::Error> {
            Ok(match RawIdent::deserialize(deserializer)? {
                RawIdent::Number(n) => Ident::Number(n),
                RawIdent::Signed(n) => Ident::Name(n.to_string()),
                RawIdent::Float(x) if is_whole_index(x) => {
                    Ident::Number(x as u64)
                }
                RawIdent::Float(x) => Ident::Name(x.to_string()),
                RawIdent::Text(text) => Ident::from(text),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_digit_text_normalizes_to_number() {
        assert_eq!("0".parse::<Ident>().unwrap(), Ident::Number(0));
        assert_eq!(Ident::from("42"), Ident::Number(42));
        assert_eq!(Ident::from("042"), Ident::Name("042".into()));
        assert_eq!(Ident::from("00"), Ident::Name("00".into()));
        assert_eq!(Ident::from("front"), Ident::Name("front".into()));
        assert_eq!(Ident::from("-1"), Ident::Name("-1".into()));
        assert_eq!(Ident::from(""), Ident::Name(String::new()));
    }

    #[test]
    fn numbers_order_before_names() {
        let mut ids = vec![
            Ident::from("rear"),
            Ident::Number(10),
            Ident::Number(2),
            Ident::from("front"),
        ];
        ids.sort();
        assert_eq!(
            ids,
            vec![
                Ident::Number(2),
                Ident::Number(10),
                Ident::from("front"),
                Ident::from("rear"),
            ]
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_numbers_and_strings_deserialize() {
        let number: Ident = serde_json::from_str("3").unwrap();
        let text: Ident = serde_json::from_str("\"3\"").unwrap();
        let name: Ident = serde_json::from_str("\"usb-cam\"").unwrap();
        assert_eq!(number, text);
        assert_eq!(name, Ident::Name("usb-cam".into()));
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"usb-cam\"");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn any_json_number_deserializes() {
        let negative: Ident = serde_json::from_str("-1").unwrap();
        let fraction: Ident = serde_json::from_str("1.5").unwrap();
        let whole: Ident = serde_json::from_str("2.0").unwrap();
        assert_eq!(negative, Ident::Name("-1".into()));
        assert_eq!(fraction, Ident::Name("1.5".into()));
        assert_eq!(whole, Ident::Number(2));
        assert!(serde_json::from_str::<Ident>("true").is_err());
    }
}
