//! Applicant profile record and the closed value types its fields are built from.
//!
//! Every field has a default, and unset optional fields serialize as `""` so the
//! backend always receives the full record.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::errors::ValueError;

/// Declares a closed set of string choices with `Display`/`FromStr` matching the
/// exact wire text.
macro_rules! choice {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValueError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|choice| choice.as_str() == raw)
                    .ok_or_else(|| ValueError::NotAChoice {
                        kind: $kind,
                        value: raw.to_string(),
                        allowed: Self::ALL.iter().map(|c| c.as_str()).collect(),
                    })
            }
        }
    };
}

choice!(Gender, "gender" {
    Male => "Male",
    Female => "Female",
});

choice!(Degree, "degree" {
    BTech => "BTech",
    BE => "BE",
});

choice!(Specialization, "specialization" {
    ComputerScience => "CS",
    InformationTechnology => "IT",
    ElectronicsAndTelecom => "E&TC",
    AiAndMl => "AI&ML",
    Mechanical => "MECH",
    Civil => "CIVIL",
});

choice!(
    /// Colleges accepted by the recruitment forms this profile targets.
    College, "college" {
        Pccoe => "Pimpri Chinchwad Education Trust's PCCOE, Pune",
        Pccoer => "Pimpri Chinchwad Education Trust's PCCOE&R",
        Nmiet => "Pimpri Chinchwad Education Trust's NMIET",
        Ncer => "Pimpri Chinchwad Education Trust's NCER",
    }
);

/// Star rating on a coding platform. Only `0..=7` is representable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    pub const MAX: u8 = 7;

    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value <= Self::MAX {
            Ok(Self(value))
        } else {
            Err(ValueError::OutOfRange {
                value: value.to_string(),
                min: 0.0,
                max: f64::from(Self::MAX),
            })
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Rating> {
        (0..=Self::MAX).map(Rating)
    }
}

impl TryFrom<u8> for Rating {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl FromStr for Rating {
    type Err = ValueError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value: u8 = raw
            .parse()
            .map_err(|_| ValueError::NotANumber(raw.to_string()))?;
        Rating::new(value)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A score in `0..=MAX`. Used for percentages and the 10-point CGPA.
///
/// Keeps the text it was parsed from, so `"8.50"` is written back as
/// `"8.50"` rather than reformatted.
#[derive(Debug, Clone, PartialEq)]
pub struct Score<const MAX: u8> {
    value: f64,
    raw: String,
}

pub type Percentage = Score<100>;
pub type Cgpa = Score<10>;

impl<const MAX: u8> Score<MAX> {
    pub fn new(value: f64) -> Result<Self, ValueError> {
        Self::checked(value, value.to_string())
    }

    fn checked(value: f64, raw: String) -> Result<Self, ValueError> {
        if (0.0..=f64::from(MAX)).contains(&value) {
            Ok(Self { value, raw })
        } else {
            Err(ValueError::OutOfRange {
                value: raw,
                min: 0.0,
                max: f64::from(MAX),
            })
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl<const MAX: u8> FromStr for Score<MAX> {
    type Err = ValueError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        let value: f64 = raw
            .parse()
            .map_err(|_| ValueError::NotANumber(raw.to_string()))?;
        Score::checked(value, raw.to_string())
    }
}

impl<const MAX: u8> fmt::Display for Score<MAX> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Link to a public profile page. Kept exactly as typed once it parses as an
/// absolute http(s) URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileLink(String);

impl ProfileLink {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ProfileLink {
    type Err = ValueError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match reqwest::Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Self(raw.to_string())),
            _ => Err(ValueError::InvalidUrl(raw.to_string())),
        }
    }
}

impl fmt::Display for ProfileLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The canonical applicant record reused across autofill submissions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    // Identity / contact
    pub email: String,
    #[serde(rename = "universityPRN")]
    pub university_prn: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub full_name: String,
    pub mobile_number: String,
    #[serde(serialize_with = "blank_if_none")]
    pub dob: Option<NaiveDate>,
    #[serde(serialize_with = "blank_if_none")]
    pub gender: Option<Gender>,

    // Academic identity
    #[serde(serialize_with = "blank_if_none")]
    pub degree: Option<Degree>,
    #[serde(serialize_with = "blank_if_none")]
    pub specialization: Option<Specialization>,
    #[serde(serialize_with = "blank_if_none")]
    pub college_name: Option<College>,
    pub graduation_year: String,

    // Scores
    #[serde(serialize_with = "blank_if_none")]
    pub tenth_percent: Option<Percentage>,
    #[serde(serialize_with = "blank_if_none")]
    pub twelfth_percent: Option<Percentage>,
    #[serde(serialize_with = "blank_if_none")]
    pub diploma_percent: Option<Percentage>,
    #[serde(rename = "BEPercent", serialize_with = "blank_if_none")]
    pub be_percent: Option<Percentage>,
    #[serde(serialize_with = "blank_if_none")]
    pub cgpa: Option<Cgpa>,

    // Achievements
    pub technical_achievements: String,
    pub personal_achievements: String,
    pub project: String,

    // Coding platforms
    #[serde(serialize_with = "blank_if_none")]
    pub codechef_link: Option<ProfileLink>,
    pub codechef_rating: Rating,
    #[serde(serialize_with = "blank_if_none")]
    pub hackerrank_link: Option<ProfileLink>,
    pub hackerrank_rating: Rating,
    #[serde(serialize_with = "blank_if_none")]
    pub leetcode_link: Option<ProfileLink>,
    #[serde(rename = "leetcodeproblemcount")]
    pub leetcode_problem_count: String,
    pub cocube_score: String,
}

fn blank_if_none<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: fmt::Display,
    S: Serializer,
{
    match value {
        Some(v) => serializer.collect_str(v),
        None => serializer.serialize_str(""),
    }
}
