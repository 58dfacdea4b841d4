//! Serde adapters for report timestamps: RFC 3339 instants and `YYYY-MM-DD` calendar dates.

use serde::{Deserialize, Deserializer, Serializer};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	let formatted = value.format(&Rfc3339).map_err(serde::ser::Error::custom)?;

	serializer.serialize_str(&formatted)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = String::deserialize(deserializer)?;

	OffsetDateTime::parse(&raw, &Rfc3339).map_err(serde::de::Error::custom)
}

pub mod date {
	use serde::{Deserialize, Deserializer, Serializer};
	use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

	pub(crate) const FORMAT: &[BorrowedFormatItem<'static>] =
		format_description!("[year]-[month]-[day]");

	pub fn serialize<S>(value: &Date, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let formatted = value.format(FORMAT).map_err(serde::ser::Error::custom)?;

		serializer.serialize_str(&formatted)
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;

		Date::parse(&raw, FORMAT).map_err(serde::de::Error::custom)
	}

	pub mod option {
		use serde::{Deserialize as _, Deserializer, Serializer};
		use time::Date;

		pub fn serialize<S>(value: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
		where
			S: Serializer,
		{
			match value {
				Some(value) => super::serialize(value, serializer),
				None => serializer.serialize_none(),
			}
		}

		pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
		where
			D: Deserializer<'de>,
		{
			let raw = Option::<String>::deserialize(deserializer)?;

			match raw {
				Some(value) =>
					Date::parse(&value, super::FORMAT).map(Some).map_err(serde::de::Error::custom),
				None => Ok(None),
			}
		}
	}
}
