use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serialize a [`DuidId`] as its native `u64`.
///
/// Equivalent to the derived implementation; provided for symmetry with
/// [`as_decimal_duid`] in `#[serde(with = "...")]` attributes.
///
/// [`DuidId`]: crate::DuidId
pub mod as_native_duid {
    use super::{Deserialize, Deserializer, Serialize, Serializer};
    use crate::DuidId;

    /// Serialize an ID as its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &DuidId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        id.to_raw().serialize(s)
    }

    /// Deserialize an ID from its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails.
    pub fn deserialize<'de, D>(d: D) -> Result<DuidId, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(d).map(DuidId::from_raw)
    }
}

/// Serialize a [`DuidId`] as an exact decimal string.
///
/// Use this for consumers whose numbers lose precision above 2^53, such as
/// JavaScript.
///
/// [`DuidId`]: crate::DuidId
pub mod as_decimal_duid {
    use super::{Deserializer, Serializer};
    use crate::DuidId;

    /// Serialize an ID as a decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &DuidId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(id)
    }

    /// Deserialize an ID from a decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The string is not a decimal `u64`
    pub fn deserialize<'de, D>(d: D) -> Result<DuidId, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DecimalVisitor;

        impl serde::de::Visitor<'_> for DecimalVisitor {
            type Value = DuidId;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a decimal string holding a 64-bit id")
            }

            #[inline]
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(serde::de::Error::custom)
            }
        }

        d.deserialize_str(DecimalVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DuidId;
    use serde_json::json;

    #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
    struct Row {
        #[serde(with = "as_native_duid")]
        native: DuidId,
        #[serde(with = "as_decimal_duid")]
        decimal: DuidId,
        derived: DuidId,
    }

    #[test]
    fn native_and_decimal_roundtrip() {
        let id = DuidId::from(DuidId::max_timestamp(), 1023, 8191);
        let row = Row {
            native: id,
            decimal: id,
            derived: id,
        };

        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(
            value,
            json!({
                "native": u64::MAX,
                "decimal": "18446744073709551615",
                "derived": u64::MAX,
            })
        );

        let back: Row = serde_json::from_value(value).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn decimal_rejects_garbage() {
        let value = json!({ "native": 1, "decimal": "12x", "derived": 1 });
        let err = serde_json::from_value::<Row>(value).unwrap_err();
        assert!(err.to_string().contains("invalid decimal id"));
    }

    #[test]
    fn decimal_rejects_numbers() {
        let value = json!({ "native": 1, "decimal": 1, "derived": 1 });
        assert!(serde_json::from_value::<Row>(value).is_err());
    }
}
