use chrono::NaiveDate;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuthorId(Uuid);

impl AuthorId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl FromStr for AuthorId {
    type Err = AuthorIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| AuthorIdError(s.into()))
    }
}

impl std::fmt::Display for AuthorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("\"{0}\" is not a valid author id")]
pub struct AuthorIdError(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorName(String);

impl AuthorName {
    pub const MAX_LEN: usize = 100;

    pub fn new(raw: &str) -> Result<Self, AuthorNameError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Err(AuthorNameError::Empty)
        } else if trimmed.chars().count() > Self::MAX_LEN {
            Err(AuthorNameError::TooLong { max: Self::MAX_LEN })
        } else {
            Ok(Self(trimmed.into()))
        }
    }

    pub fn new_unchecked(raw: &str) -> Self {
        Self(raw.into())
    }
}

impl std::fmt::Display for AuthorName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthorNameError {
    #[error("Author name cannot be empty")]
    Empty,
    #[error("Author name cannot be longer than {max} characters")]
    TooLong { max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nationality(String);

impl Nationality {
    pub const MAX_LEN: usize = 50;

    pub fn new(raw: &str) -> Result<Self, NationalityError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Err(NationalityError::Empty)
        } else if trimmed.chars().count() > Self::MAX_LEN {
            Err(NationalityError::TooLong { max: Self::MAX_LEN })
        } else {
            Ok(Self(trimmed.into()))
        }
    }

    pub fn new_unchecked(raw: &str) -> Self {
        Self(raw.into())
    }
}

impl std::fmt::Display for Nationality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NationalityError {
    #[error("Nationality cannot be empty")]
    Empty,
    #[error("Nationality cannot be longer than {max} characters")]
    TooLong { max: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthDate(NaiveDate);

impl BirthDate {
    /// Accepts only dates strictly before `today`.
    pub fn new(date: NaiveDate, today: NaiveDate) -> Result<Self, BirthDateError> {
        if date < today {
            Ok(Self(date))
        } else {
            Err(BirthDateError::NotInPast(date))
        }
    }

    /// Parses an ISO `YYYY-MM-DD` date and applies the same rule as [`BirthDate::new`].
    pub fn parse(raw: &str, today: NaiveDate) -> Result<Self, BirthDateError> {
        let raw = raw.trim();
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| BirthDateError::Invalid(raw.into()))?;
        Self::new(date, today)
    }

    pub const fn new_unchecked(date: NaiveDate) -> Self {
        Self(date)
    }

    #[must_use]
    pub const fn as_date(&self) -> NaiveDate {
        self.0
    }
}

impl std::fmt::Display for BirthDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BirthDateError {
    #[error("Birth date \"{0}\" is not a valid YYYY-MM-DD date")]
    Invalid(String),
    #[error("Birth date {0} must be in the past")]
    NotInPast(NaiveDate),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    id: AuthorId,
    name: AuthorName,
    birth_date: BirthDate,
    nationality: Nationality,
}

impl Author {
    pub const fn new(
        id: AuthorId,
        name: AuthorName,
        birth_date: BirthDate,
        nationality: Nationality,
    ) -> Self {
        Self {
            id,
            name,
            birth_date,
            nationality,
        }
    }

    pub const fn id(&self) -> AuthorId {
        self.id
    }

    pub const fn name(&self) -> &AuthorName {
        &self.name
    }

    pub const fn birth_date(&self) -> BirthDate {
        self.birth_date
    }

    pub const fn nationality(&self) -> &Nationality {
        &self.nationality
    }
}

#[derive(Debug, Clone)]
pub struct CreateAuthorRequest {
    name: AuthorName,
    birth_date: BirthDate,
    nationality: Nationality,
}

impl CreateAuthorRequest {
    pub const fn new(name: AuthorName, birth_date: BirthDate, nationality: Nationality) -> Self {
        Self {
            name,
            birth_date,
            nationality,
        }
    }

    pub const fn name(&self) -> &AuthorName {
        &self.name
    }

    pub const fn birth_date(&self) -> BirthDate {
        self.birth_date
    }

    pub const fn nationality(&self) -> &Nationality {
        &self.nationality
    }
}

#[derive(Error, Debug)]
pub enum CreateAuthorError {
    #[error("Author \"{name}\" is already registered")]
    Duplicate { name: String },
    #[error(transparent)]
    Other(anyhow::Error),
}

#[derive(Debug)]
pub struct FindAuthorRequest {
    id: AuthorId,
}

impl FindAuthorRequest {
    pub const fn new(id: AuthorId) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> AuthorId {
        self.id
    }
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct FindAuthorError(#[from] pub anyhow::Error);

/// Query-by-example criteria. Absent fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchAuthorsRequest {
    name: Option<String>,
    nationality: Option<String>,
}

impl SearchAuthorsRequest {
    pub const fn new(name: Option<String>, nationality: Option<String>) -> Self {
        Self { name, nationality }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn nationality(&self) -> Option<&str> {
        self.nationality.as_deref()
    }
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct SearchAuthorsError(#[from] pub anyhow::Error);

/// Full replacement of an author's mutable fields, keyed by `id`.
#[derive(Debug, Clone)]
pub struct UpdateAuthorRequest {
    id: AuthorId,
    name: AuthorName,
    birth_date: BirthDate,
    nationality: Nationality,
}

impl UpdateAuthorRequest {
    pub const fn new(
        id: AuthorId,
        name: AuthorName,
        birth_date: BirthDate,
        nationality: Nationality,
    ) -> Self {
        Self {
            id,
            name,
            birth_date,
            nationality,
        }
    }

    pub const fn id(&self) -> AuthorId {
        self.id
    }

    pub const fn name(&self) -> &AuthorName {
        &self.name
    }

    pub const fn birth_date(&self) -> BirthDate {
        self.birth_date
    }

    pub const fn nationality(&self) -> &Nationality {
        &self.nationality
    }
}

#[derive(Error, Debug)]
pub enum UpdateAuthorError {
    #[error("Author with id \"{id}\" does not exist")]
    NotFound { id: AuthorId },
    #[error("Author \"{name}\" is already registered")]
    Duplicate { name: String },
    #[error(transparent)]
    Other(anyhow::Error),
}

#[derive(Debug)]
pub struct DeleteAuthorRequest {
    id: AuthorId,
}

impl DeleteAuthorRequest {
    pub const fn new(id: AuthorId) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> AuthorId {
        self.id
    }
}

#[derive(Error, Debug)]
pub enum DeleteAuthorError {
    #[error("Author with id \"{id}\" does not exist")]
    NotFound { id: AuthorId },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
