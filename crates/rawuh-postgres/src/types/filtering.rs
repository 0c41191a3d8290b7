//! Structured filter language for list queries.
//!
//! Clients send a base64 encoded conjunction such as
//! `event_name ILIKE '%gala%' AND start_date >= '2025-01-01T00:00:00Z'`.
//! The text is parsed into typed [`FilterTerm`]s over a per-resource column
//! enum; repositories turn each term into a bound diesel predicate, so the
//! client text is never spliced into SQL.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Standard alphabet, padding accepted but not required.
const FILTER_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Maximum number of terms in a single filter.
pub const MAX_TERMS: usize = 32;

/// Reasons a filter is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("filter is not valid base64")]
    Encoding,
    #[error("filter is not valid UTF-8")]
    Utf8,
    #[error("unexpected character {found:?} at byte {position}")]
    UnexpectedChar { position: usize, found: char },
    #[error("unterminated string starting at byte {0}")]
    UnterminatedString(usize),
    #[error("invalid integer literal {0:?}")]
    InvalidInteger(String),
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
    },
    #[error("expected {0}, found end of filter")]
    UnexpectedEnd(&'static str),
    #[error("column {0:?} cannot be filtered")]
    UnknownColumn(String),
    #[error("column {column} expects a {expected} value")]
    TypeMismatch { column: String, expected: ColumnKind },
    #[error("operator {op} is not supported on column {column}")]
    UnsupportedOperator { column: String, op: FilterOp },
    #[error("invalid RFC 3339 timestamp {0:?}")]
    InvalidTimestamp(String),
    #[error("filter has more than {} terms", MAX_TERMS)]
    TooManyTerms,
}

/// Comparison operator of a filter term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
    ILike,
}

impl FilterOp {
    /// Returns whether this is a pattern match operator.
    #[inline]
    pub fn is_pattern(self) -> bool {
        matches!(self, Self::Like | Self::ILike)
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Like => "LIKE",
            Self::ILike => "ILIKE",
        })
    }
}

/// Value type accepted by a filterable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ColumnKind {
    Text,
    Integer,
    Timestamp,
}

/// Typed right-hand side of a filter term.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
    Timestamp(jiff::Timestamp),
}

/// Column enum that may appear on the left-hand side of a filter term.
pub trait FilterColumn: FromStr + Copy + fmt::Display {
    /// Value type the column compares against.
    fn kind(self) -> ColumnKind;
}

/// A single `column op value` comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterTerm<C> {
    pub column: C,
    pub op: FilterOp,
    pub value: FilterValue,
}

/// Conjunction of filter terms over the columns `C`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter<C> {
    terms: Vec<FilterTerm<C>>,
}

impl<C> Default for Filter<C> {
    fn default() -> Self {
        Self { terms: Vec::new() }
    }
}

impl<C: FilterColumn> Filter<C> {
    /// Decodes and parses a base64 filter. Empty input is an empty filter.
    pub fn decode(encoded: &str) -> Result<Self, FilterError> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Ok(Self::default());
        }

        let bytes = FILTER_ENGINE
            .decode(encoded)
            .map_err(|_| FilterError::Encoding)?;
        let text = String::from_utf8(bytes).map_err(|_| FilterError::Utf8)?;
        Self::parse(&text)
    }

    /// Parses decoded filter text.
    pub fn parse(text: &str) -> Result<Self, FilterError> {
        let mut tokens = tokenize(text)?.into_iter();
        let mut terms = Vec::new();

        if tokens.len() == 0 {
            return Ok(Self::default());
        }

        loop {
            if terms.len() == MAX_TERMS {
                return Err(FilterError::TooManyTerms);
            }

            let name = match tokens.next() {
                Some(Token::Ident(name)) => name,
                Some(other) => return Err(other.unexpected("column name")),
                None => return Err(FilterError::UnexpectedEnd("column name")),
            };
            let column = name
                .to_ascii_lowercase()
                .parse::<C>()
                .map_err(|_| FilterError::UnknownColumn(name))?;

            let op = match tokens.next() {
                Some(Token::Op(op)) => op,
                Some(Token::Ident(word)) if word.eq_ignore_ascii_case("like") => FilterOp::Like,
                Some(Token::Ident(word)) if word.eq_ignore_ascii_case("ilike") => FilterOp::ILike,
                Some(other) => return Err(other.unexpected("operator")),
                None => return Err(FilterError::UnexpectedEnd("operator")),
            };

            let value = match tokens.next() {
                Some(token @ (Token::Str(_) | Token::Int(_))) => token,
                Some(other) => return Err(other.unexpected("value")),
                None => return Err(FilterError::UnexpectedEnd("value")),
            };

            terms.push(typed_term(column, op, value)?);

            match tokens.next() {
                None => break,
                Some(Token::Ident(word)) if word.eq_ignore_ascii_case("and") => {}
                Some(other) => return Err(other.unexpected("AND")),
            }
        }

        Ok(Self { terms })
    }
}

impl<C> Filter<C> {
    /// Returns whether the filter adds no predicate.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms of the conjunction, in input order.
    #[inline]
    pub fn terms(&self) -> &[FilterTerm<C>] {
        &self.terms
    }
}

impl<C> IntoIterator for Filter<C> {
    type IntoIter = std::vec::IntoIter<FilterTerm<C>>;
    type Item = FilterTerm<C>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.into_iter()
    }
}

fn typed_term<C: FilterColumn>(
    column: C,
    op: FilterOp,
    value: Token,
) -> Result<FilterTerm<C>, FilterError> {
    let kind = column.kind();
    let mismatch = || FilterError::TypeMismatch {
        column: column.to_string(),
        expected: kind,
    };

    if op.is_pattern() && kind != ColumnKind::Text {
        return Err(FilterError::UnsupportedOperator {
            column: column.to_string(),
            op,
        });
    }

    let value = match (kind, value) {
        (ColumnKind::Text, Token::Str(s)) => FilterValue::Text(s),
        (ColumnKind::Integer, Token::Int(i)) => FilterValue::Integer(i),
        (ColumnKind::Timestamp, Token::Str(s)) => {
            let ts = s
                .parse::<jiff::Timestamp>()
                .map_err(|_| FilterError::InvalidTimestamp(s))?;
            FilterValue::Timestamp(ts)
        }
        _ => return Err(mismatch()),
    };

    Ok(FilterTerm { column, op, value })
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Op(FilterOp),
    Str(String),
    Int(i64),
}

impl Token {
    fn unexpected(&self, expected: &'static str) -> FilterError {
        let found = match self {
            Self::Ident(ident) => format!("word {ident:?}"),
            Self::Op(op) => format!("operator {op}"),
            Self::Str(_) => "string literal".to_owned(),
            Self::Int(i) => format!("integer {i}"),
        };
        FilterError::UnexpectedToken { expected, found }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, FilterError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(position, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '\'' => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some((_, '\'')) if matches!(chars.peek(), Some((_, '\''))) => {
                            chars.next();
                            value.push('\'');
                        }
                        Some((_, '\'')) => break,
                        Some((_, c)) => value.push(c),
                        None => return Err(FilterError::UnterminatedString(position)),
                    }
                }
                tokens.push(Token::Str(value));
            }
            '=' => {
                chars.next();
                tokens.push(Token::Op(FilterOp::Eq));
            }
            '!' => {
                chars.next();
                match chars.next() {
                    Some((_, '=')) => tokens.push(Token::Op(FilterOp::NotEq)),
                    _ => return Err(FilterError::UnexpectedChar { position, found: '!' }),
                }
            }
            '<' | '>' => {
                chars.next();
                let op = match (c, chars.peek().map(|&(_, next)| next)) {
                    ('<', Some('=')) => Some(FilterOp::LtEq),
                    ('<', Some('>')) => Some(FilterOp::NotEq),
                    ('>', Some('=')) => Some(FilterOp::GtEq),
                    _ => None,
                };
                match op {
                    Some(op) => {
                        chars.next();
                        tokens.push(Token::Op(op));
                    }
                    None if c == '<' => tokens.push(Token::Op(FilterOp::Lt)),
                    None => tokens.push(Token::Op(FilterOp::Gt)),
                }
            }
            c if c.is_ascii_digit() || c == '-' => {
                chars.next();
                let mut literal = String::from(c);
                while let Some(&(_, d)) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    literal.push(d);
                    chars.next();
                }
                let value = literal
                    .parse::<i64>()
                    .map_err(|_| FilterError::InvalidInteger(literal))?;
                tokens.push(Token::Int(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&(_, d)) = chars.peek() {
                    if !(d.is_ascii_alphanumeric() || d == '_') {
                        break;
                    }
                    ident.push(d);
                    chars.next();
                }
                tokens.push(Token::Ident(ident));
            }
            found => return Err(FilterError::UnexpectedChar { position, found }),
        }
    }

    Ok(tokens)
}

/// Filterable project columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ProjectFilterColumn {
    ProjectName,
    Status,
    StatusDesc,
    CreatedAt,
    UpdatedAt,
}

impl FilterColumn for ProjectFilterColumn {
    fn kind(self) -> ColumnKind {
        match self {
            Self::ProjectName | Self::StatusDesc => ColumnKind::Text,
            Self::Status => ColumnKind::Integer,
            Self::CreatedAt | Self::UpdatedAt => ColumnKind::Timestamp,
        }
    }
}

/// Filterable event columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum EventFilterColumn {
    EventName,
    Description,
    StartDate,
    EndDate,
    CreatedAt,
    UpdatedAt,
}

impl FilterColumn for EventFilterColumn {
    fn kind(self) -> ColumnKind {
        match self {
            Self::EventName | Self::Description => ColumnKind::Text,
            Self::StartDate | Self::EndDate | Self::CreatedAt | Self::UpdatedAt => {
                ColumnKind::Timestamp
            }
        }
    }
}

/// Filterable guest columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum GuestFilterColumn {
    Name,
    Address,
    Phone,
    Email,
    CreatedAt,
}

impl FilterColumn for GuestFilterColumn {
    fn kind(self) -> ColumnKind {
        match self {
            Self::CreatedAt => ColumnKind::Timestamp,
            _ => ColumnKind::Text,
        }
    }
}

/// Filterable user columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum UserFilterColumn {
    Name,
    Username,
    Email,
    UserType,
    ProjectId,
    EventId,
    Status,
    CreatedAt,
}

impl FilterColumn for UserFilterColumn {
    fn kind(self) -> ColumnKind {
        match self {
            Self::Name | Self::Username | Self::Email | Self::UserType => ColumnKind::Text,
            Self::ProjectId | Self::EventId | Self::Status => ColumnKind::Integer,
            Self::CreatedAt => ColumnKind::Timestamp,
        }
    }
}

/// Filter over project columns.
pub type ProjectFilter = Filter<ProjectFilterColumn>;
/// Filter over event columns.
pub type EventFilter = Filter<EventFilterColumn>;
/// Filter over guest columns.
pub type GuestFilter = Filter<GuestFilterColumn>;
/// Filter over user columns.
pub type UserFilter = Filter<UserFilterColumn>;

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};

    use super::*;

    #[test]
    fn empty_input_is_empty_filter() {
        assert!(EventFilter::decode("").unwrap().is_empty());
        assert!(EventFilter::decode("   ").unwrap().is_empty());
        assert!(EventFilter::parse("  ").unwrap().is_empty());
    }

    #[test]
    fn decodes_with_and_without_padding() {
        let text = "name = 'Anne'";
        let padded = STANDARD.encode(text);
        let unpadded = STANDARD_NO_PAD.encode(text);
        assert_ne!(padded, unpadded);

        let expected = GuestFilter::parse(text).unwrap();
        assert_eq!(GuestFilter::decode(&padded).unwrap(), expected);
        assert_eq!(GuestFilter::decode(&unpadded).unwrap(), expected);
    }

    #[test]
    fn invalid_base64_is_rejected() {
        assert_eq!(GuestFilter::decode("%%%"), Err(FilterError::Encoding));
    }

    #[test]
    fn parses_conjunction() {
        let filter = EventFilter::parse(
            "event_name ILIKE '%gala%' and start_date >= '2025-01-01T00:00:00Z' AND description <> 'it''s'",
        )
        .unwrap();

        let terms = filter.terms();
        assert_eq!(terms.len(), 3);
        assert_eq!(terms[0].column, EventFilterColumn::EventName);
        assert_eq!(terms[0].op, FilterOp::ILike);
        assert_eq!(terms[0].value, FilterValue::Text("%gala%".into()));
        assert_eq!(terms[1].column, EventFilterColumn::StartDate);
        assert_eq!(terms[1].op, FilterOp::GtEq);
        assert!(matches!(terms[1].value, FilterValue::Timestamp(_)));
        assert_eq!(terms[2].op, FilterOp::NotEq);
        assert_eq!(terms[2].value, FilterValue::Text("it's".into()));
    }

    #[test]
    fn integer_columns_take_integers() {
        let filter = UserFilter::parse("project_id = 7 AND status != -1").unwrap();
        assert_eq!(filter.terms()[0].value, FilterValue::Integer(7));
        assert_eq!(filter.terms()[1].value, FilterValue::Integer(-1));

        assert!(matches!(
            UserFilter::parse("project_id = '7'"),
            Err(FilterError::TypeMismatch { .. })
        ));
        assert!(matches!(
            UserFilter::parse("name = 7"),
            Err(FilterError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn unknown_column_is_rejected() {
        assert_eq!(
            GuestFilter::parse("password = 'x'"),
            Err(FilterError::UnknownColumn("password".into()))
        );
        // Tenant columns are scoped by the server, never by the client.
        assert!(GuestFilter::parse("project_id = 8").is_err());
    }

    #[test]
    fn injection_attempts_do_not_parse() {
        for text in [
            "name = 'a' OR 1 = 1",
            "name = 'a'; DROP TABLE guests",
            "name = 'a' -- comment",
            "1 = 1",
            "name = 'unterminated",
        ] {
            assert!(GuestFilter::parse(text).is_err(), "{text}");
        }
    }

    #[test]
    fn pattern_operators_need_text_columns() {
        assert!(matches!(
            ProjectFilter::parse("status LIKE 1"),
            Err(FilterError::UnsupportedOperator { .. })
        ));
        assert!(ProjectFilter::parse("project_name like 'A%'").is_ok());
    }

    #[test]
    fn timestamps_must_be_rfc3339() {
        assert!(matches!(
            GuestFilter::parse("created_at > 'yesterday'"),
            Err(FilterError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn incomplete_terms_are_rejected() {
        assert_eq!(
            GuestFilter::parse("name ="),
            Err(FilterError::UnexpectedEnd("value"))
        );
        assert_eq!(
            GuestFilter::parse("name = 'a' AND"),
            Err(FilterError::UnexpectedEnd("column name"))
        );
    }

    #[test]
    fn term_count_is_bounded() {
        let text = vec!["name = 'a'"; MAX_TERMS + 1].join(" AND ");
        assert_eq!(GuestFilter::parse(&text), Err(FilterError::TooManyTerms));

        let text = vec!["name = 'a'"; MAX_TERMS].join(" AND ");
        assert_eq!(GuestFilter::parse(&text).unwrap().terms().len(), MAX_TERMS);
    }
}
