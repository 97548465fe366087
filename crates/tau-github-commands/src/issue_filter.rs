use crate::command_errors::ValidationError;
use crate::issue_command_parser::{IssueCountArg, IssueFilters};

pub const MIN_ISSUE_COUNT: u8 = 1;
pub const MAX_ISSUE_COUNT: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Enumerates supported `IssueStateFilter` values.
pub enum IssueStateFilter {
    #[default]
    Open,
    Closed,
    All,
}

pub const ISSUE_STATE_FILTERS: [IssueStateFilter; 3] = [
    IssueStateFilter::Open,
    IssueStateFilter::Closed,
    IssueStateFilter::All,
];

impl IssueStateFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }

    fn allowed_values() -> String {
        ISSUE_STATE_FILTERS
            .iter()
            .map(IssueStateFilter::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Validated filters forwarded to the issue lister.
pub struct IssueQuery {
    pub count: u8,
    pub state: IssueStateFilter,
    pub creator: Option<String>,
}

fn validate_state(raw: &str) -> Result<IssueStateFilter, ValidationError> {
    let normalized = raw.trim().to_ascii_lowercase();
    ISSUE_STATE_FILTERS
        .iter()
        .copied()
        .find(|state| state.as_str() == normalized)
        .ok_or_else(|| ValidationError::InvalidState {
            value: raw.to_string(),
            allowed: IssueStateFilter::allowed_values(),
        })
}

fn validate_creator(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyCreator);
    }
    Ok(trimmed.to_string())
}

/// Checks `state` then `creator`, returning the first failure only.
pub fn validate_issue_filters(
    filters: &IssueFilters,
) -> Result<(IssueStateFilter, Option<String>), ValidationError> {
    let state = filters
        .state
        .as_deref()
        .map(validate_state)
        .transpose()?
        .unwrap_or_default();
    let creator = filters.creator.as_deref().map(validate_creator).transpose()?;
    Ok((state, creator))
}

pub fn validate_issue_count(count: &IssueCountArg) -> Result<u8, ValidationError> {
    let out_of_range = ValidationError::CountOutOfRange {
        min: MIN_ISSUE_COUNT,
        max: MAX_ISSUE_COUNT,
    };
    match count {
        IssueCountArg::Number(value)
            if (i64::from(MIN_ISSUE_COUNT)..=i64::from(MAX_ISSUE_COUNT)).contains(value) =>
        {
            u8::try_from(*value).map_err(|_| out_of_range)
        }
        IssueCountArg::Number(_) | IssueCountArg::Malformed(_) => Err(out_of_range),
    }
}

/// Count bounds are checked before filters so a bad count always wins.
pub fn build_issue_query(
    count: &IssueCountArg,
    filters: &IssueFilters,
) -> Result<IssueQuery, ValidationError> {
    let count = validate_issue_count(count)?;
    let (state, creator) = validate_issue_filters(filters)?;
    Ok(IssueQuery {
        count,
        state,
        creator,
    })
}

#[cfg(test)]
mod tests {
    use super::{
        build_issue_query, validate_issue_count, validate_issue_filters, IssueQuery,
        IssueStateFilter,
    };
    use crate::command_errors::ValidationError;
    use crate::issue_command_parser::{IssueCountArg, IssueFilters};

    fn filters(state: Option<&str>, creator: Option<&str>) -> IssueFilters {
        IssueFilters {
            state: state.map(ToOwned::to_owned),
            creator: creator.map(ToOwned::to_owned),
        }
    }

    #[test]
    fn unit_validate_issue_filters_defaults_to_open_without_creator() {
        assert_eq!(
            validate_issue_filters(&IssueFilters::default()),
            Ok((IssueStateFilter::Open, None))
        );
    }

    #[test]
    fn functional_validate_issue_filters_normalizes_state_and_trims_creator() {
        assert_eq!(
            validate_issue_filters(&filters(Some(" Closed "), Some("  alice "))),
            Ok((IssueStateFilter::Closed, Some("alice".to_string())))
        );
        assert_eq!(
            validate_issue_filters(&filters(Some("all"), None)),
            Ok((IssueStateFilter::All, None))
        );
    }

    #[test]
    fn functional_validate_issue_filters_names_invalid_state_and_allowed_set() {
        let error = validate_issue_filters(&filters(Some("draft"), None)).expect_err("invalid");
        assert_eq!(
            error.to_string(),
            "Invalid state: `draft`. Must be one of: open, closed, all."
        );
    }

    #[test]
    fn regression_validate_issue_filters_reports_state_before_creator() {
        let error =
            validate_issue_filters(&filters(Some("merged"), Some("   "))).expect_err("invalid");
        assert!(matches!(error, ValidationError::InvalidState { .. }));

        let error = validate_issue_filters(&filters(Some("open"), Some(""))).expect_err("invalid");
        assert_eq!(error, ValidationError::EmptyCreator);
    }

    #[test]
    fn integration_validate_issue_count_enforces_bounds_and_rejects_malformed() {
        assert_eq!(validate_issue_count(&IssueCountArg::Number(1)), Ok(1));
        assert_eq!(validate_issue_count(&IssueCountArg::Number(50)), Ok(50));
        for count in [
            IssueCountArg::Number(0),
            IssueCountArg::Number(51),
            IssueCountArg::Number(-3),
            IssueCountArg::Number(i64::MAX),
            IssueCountArg::Malformed("ten".to_string()),
        ] {
            assert_eq!(
                validate_issue_count(&count),
                Err(ValidationError::CountOutOfRange { min: 1, max: 50 })
            );
        }
    }

    #[test]
    fn regression_build_issue_query_checks_count_before_filters() {
        let error = build_issue_query(&IssueCountArg::Number(99), &filters(Some("bogus"), None))
            .expect_err("invalid");
        assert!(matches!(error, ValidationError::CountOutOfRange { .. }));

        let query = build_issue_query(&IssueCountArg::Number(10), &filters(None, Some("bob")))
            .expect("valid query");
        assert_eq!(
            query,
            IssueQuery {
                count: 10,
                state: IssueStateFilter::Open,
                creator: Some("bob".to_string()),
            }
        );
    }
}
