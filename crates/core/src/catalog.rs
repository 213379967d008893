//! Listing catalog query model.
//!
//! Turns raw query-string values into a validated [`ListingQuery`] and exposes
//! the filter as a declarative predicate list, so the repository never has to
//! branch on individual fields.

use serde::{Deserialize, Serialize};

use crate::types::RefId;
use crate::validation::FieldErrors;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_PAGE: i64 = 1;

pub const DEFAULT_PAGE_SIZE: i64 = 20;

pub const MAX_PAGE_SIZE: i64 = 100;

/// Page size of each home feed section.
pub const HOME_FEED_PAGE_SIZE: i64 = 8;

/// Sort values accepted on the catalog endpoint.
pub const SORT_SAFELIST: &[&str] = &["updated", "-updated"];

pub const DEFAULT_SORT: &str = "updated";

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Updated,
}

impl SortColumn {
    pub fn sql(self) -> &'static str {
        match self {
            SortColumn::Updated => "l.updated_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Sort {
    /// Parse a safelisted sort value. A leading `-` means descending.
    pub fn parse(raw: &str) -> Option<Self> {
        if !SORT_SAFELIST.contains(&raw) {
            return None;
        }
        let (direction, name) = match raw.strip_prefix('-') {
            Some(rest) => (SortDirection::Desc, rest),
            None => (SortDirection::Asc, raw),
        };
        let column = match name {
            "updated" => SortColumn::Updated,
            _ => return None,
        };
        Some(Sort { column, direction })
    }

    pub fn newest_first() -> Self {
        Sort {
            column: SortColumn::Updated,
            direction: SortDirection::Desc,
        }
    }
}

impl Default for Sort {
    fn default() -> Self {
        Sort {
            column: SortColumn::Updated,
            direction: SortDirection::Asc,
        }
    }
}

// ---------------------------------------------------------------------------
// Paging
// ---------------------------------------------------------------------------

/// A validated 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    page_size: i64,
}

impl PageRequest {
    /// Build a page request; both values must be positive.
    pub fn new(page: i64, page_size: i64) -> Option<Self> {
        (page >= 1 && page_size >= 1).then_some(PageRequest { page, page_size })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Pagination metadata returned next to every catalog page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub current_page: i64,
    pub page_size: i64,
    pub first_page: i64,
    pub last_page: i64,
    pub total_records: i64,
}

impl PageMetadata {
    /// `last_page` is `ceil(total_records / page_size)`; an empty result has
    /// `first_page = 1` and `last_page = 0`.
    pub fn calculate(total_records: i64, page: PageRequest) -> Self {
        let last_page = if total_records == 0 {
            0
        } else {
            (total_records + page.page_size - 1) / page.page_size
        };
        PageMetadata {
            current_page: page.page,
            page_size: page.page_size,
            first_page: 1,
            last_page,
            total_records,
        }
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Inclusive year range; either bound may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YearRange {
    pub start: Option<i32>,
    pub end: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    pub make: Option<RefId>,
    pub model: Option<RefId>,
    pub version: Option<RefId>,
    pub year: YearRange,
    pub city: Option<RefId>,
    pub area: Option<RefId>,
    pub fuel_type: Option<RefId>,
    pub transmission_is_auto: Option<bool>,
    pub active: Option<bool>,
    pub featured: Option<bool>,
    pub gp_managed: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateOp {
    Eq,
    AtLeast,
    AtMost,
}

impl PredicateOp {
    pub fn sql(self) -> &'static str {
        match self {
            PredicateOp::Eq => "=",
            PredicateOp::AtLeast => ">=",
            PredicateOp::AtMost => "<=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateValue {
    Int(i32),
    Bool(bool),
}

/// One `column op value` term of the catalog WHERE clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Predicate {
    pub column: &'static str,
    pub op: PredicateOp,
    pub value: PredicateValue,
}

impl ListingFilter {
    /// Every filterable column with its optional value, in a fixed order.
    ///
    /// Column names are qualified with the aliases used by the catalog query
    /// (`l` for listings, `t` for transmissions).
    fn terms(&self) -> [(&'static str, PredicateOp, Option<PredicateValue>); 12] {
        use PredicateOp::{AtLeast, AtMost, Eq};
        let int = |v: Option<i32>| v.map(PredicateValue::Int);
        let boolean = |v: Option<bool>| v.map(PredicateValue::Bool);
        [
            ("l.make", Eq, int(self.make)),
            ("l.model", Eq, int(self.model)),
            ("l.version", Eq, int(self.version)),
            ("l.year", AtLeast, int(self.year.start)),
            ("l.year", AtMost, int(self.year.end)),
            ("l.city", Eq, int(self.city)),
            ("l.area", Eq, int(self.area)),
            ("l.fuel_type", Eq, int(self.fuel_type)),
            ("t.is_auto", Eq, boolean(self.transmission_is_auto)),
            ("l.active", Eq, boolean(self.active)),
            ("l.featured", Eq, boolean(self.featured)),
            ("l.gp_managed", Eq, boolean(self.gp_managed)),
        ]
    }

    /// The predicates for every constraint that is present, ANDed by the caller.
    pub fn predicates(&self) -> Vec<Predicate> {
        self.terms()
            .into_iter()
            .filter_map(|(column, op, value)| value.map(|value| Predicate { column, op, value }))
            .collect()
    }
}

/// A fully validated catalog request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub filter: ListingFilter,
    pub sort: Sort,
    pub page: PageRequest,
}

// ---------------------------------------------------------------------------
// Home feed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeFeedSection {
    Featured,
    GpManaged,
    Recent,
}

impl HomeFeedSection {
    pub const ALL: [HomeFeedSection; 3] = [
        HomeFeedSection::Featured,
        HomeFeedSection::GpManaged,
        HomeFeedSection::Recent,
    ];

    /// The fixed query behind this section: first page of active listings,
    /// newest first.
    pub fn query(self) -> ListingQuery {
        let (featured, gp_managed) = match self {
            HomeFeedSection::Featured => (true, false),
            HomeFeedSection::GpManaged => (false, true),
            HomeFeedSection::Recent => (false, false),
        };
        ListingQuery {
            filter: ListingFilter {
                active: Some(true),
                featured: Some(featured),
                gp_managed: Some(gp_managed),
                ..ListingFilter::default()
            },
            sort: Sort::newest_first(),
            page: PageRequest {
                page: 1,
                page_size: HOME_FEED_PAGE_SIZE,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Query-string parsing
// ---------------------------------------------------------------------------

/// Raw catalog query-string values, kept as strings so every malformed field
/// can be reported by name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingQueryParams {
    pub make: Option<String>,
    pub model: Option<String>,
    pub version: Option<String>,
    pub year: Option<String>,
    pub city: Option<String>,
    pub area: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission_is_auto: Option<String>,
    pub active: Option<String>,
    pub featured: Option<String>,
    pub gp_managed: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub sort: Option<String>,
}

impl ListingQueryParams {
    /// Validate every field, returning all problems at once.
    pub fn parse(&self) -> Result<ListingQuery, FieldErrors> {
        let mut errors = FieldErrors::new();

        let page = read_count(&mut errors, "page", self.page.as_deref(), DEFAULT_PAGE);
        let page_size = read_count(
            &mut errors,
            "page_size",
            self.page_size.as_deref(),
            DEFAULT_PAGE_SIZE,
        );
        errors.check(
            page_size <= MAX_PAGE_SIZE,
            "page_size",
            "must be a maximum of 100",
        );

        let sort_raw = non_empty(self.sort.as_deref()).unwrap_or(DEFAULT_SORT);
        let sort = Sort::parse(sort_raw);
        errors.check(sort.is_some(), "sort", "invalid sort value");

        let filter = ListingFilter {
            make: read_ref_id(&mut errors, "make", self.make.as_deref()),
            model: read_ref_id(&mut errors, "model", self.model.as_deref()),
            version: read_ref_id(&mut errors, "version", self.version.as_deref()),
            year: read_year_range(&mut errors, self.year.as_deref()),
            city: read_ref_id(&mut errors, "city", self.city.as_deref()),
            area: read_ref_id(&mut errors, "area", self.area.as_deref()),
            fuel_type: read_ref_id(&mut errors, "fuel_type", self.fuel_type.as_deref()),
            transmission_is_auto: read_bool(
                &mut errors,
                "transmission_is_auto",
                self.transmission_is_auto.as_deref(),
            ),
            active: read_bool(&mut errors, "active", self.active.as_deref()),
            featured: read_bool(&mut errors, "featured", self.featured.as_deref()),
            gp_managed: read_bool(&mut errors, "gp_managed", self.gp_managed.as_deref()),
        };

        errors.into_result()?;

        Ok(ListingQuery {
            filter,
            sort: sort.unwrap_or_default(),
            page: PageRequest::new(page, page_size).unwrap_or_default(),
        })
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Positive integer with a default when absent.
fn read_count(errors: &mut FieldErrors, field: &str, raw: Option<&str>, default: i64) -> i64 {
    let Some(raw) = non_empty(raw) else {
        return default;
    };
    match raw.parse::<i64>() {
        Ok(n) if n >= 1 => n,
        Ok(_) => {
            errors.add(field, "must be greater than zero");
            default
        }
        Err(_) => {
            errors.add(field, "must be an integer value");
            default
        }
    }
}

/// Optional reference id. Zero is rejected: it is the "unset" sentinel, not
/// a row, and must never reach an equality comparison.
fn read_ref_id(errors: &mut FieldErrors, field: &str, raw: Option<&str>) -> Option<RefId> {
    let raw = non_empty(raw)?;
    match raw.parse::<RefId>() {
        Ok(id) if id >= 1 => Some(id),
        Ok(_) => {
            errors.add(field, "must be a positive integer");
            None
        }
        Err(_) => {
            errors.add(field, "must be an integer value");
            None
        }
    }
}

fn read_bool(errors: &mut FieldErrors, field: &str, raw: Option<&str>) -> Option<bool> {
    match non_empty(raw)? {
        "true" => Some(true),
        "false" => Some(false),
        _ => {
            errors.add(field, "must be true or false");
            None
        }
    }
}

/// `START-END`, `START-`, `-END` or a single `YEAR`.
fn read_year_range(errors: &mut FieldErrors, raw: Option<&str>) -> YearRange {
    let Some(raw) = non_empty(raw) else {
        return YearRange::default();
    };

    let (start_raw, end_raw) = match raw.split_once('-') {
        Some((start, end)) => (start.trim(), end.trim()),
        None => (raw, raw),
    };

    let mut bound = |s: &str| -> Option<i32> {
        if s.is_empty() {
            return None;
        }
        match s.parse::<i32>() {
            Ok(y) if y >= 1 => Some(y),
            _ => {
                errors.add("year", "must be a range of positive years, e.g. 2015-2020");
                None
            }
        }
    };

    let start = bound(start_raw);
    let end = bound(end_raw);

    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            errors.add("year", "start must not be after end");
            return YearRange::default();
        }
    }

    YearRange { start, end }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ListingQueryParams {
        ListingQueryParams::default()
    }

    // -- parsing ---------------------------------------------------------------

    #[test]
    fn empty_query_uses_defaults() {
        let q = params().parse().unwrap();
        assert_eq!(q.page, PageRequest::new(1, 20).unwrap());
        assert_eq!(q.sort, Sort::default());
        assert!(q.filter.predicates().is_empty());
    }

    #[test]
    fn version_zero_is_rejected() {
        let p = ListingQueryParams {
            version: Some("0".into()),
            ..params()
        };
        let errors = p.parse().unwrap_err();
        assert_eq!(errors.get("version"), Some("must be a positive integer"));
    }

    #[test]
    fn unknown_sort_is_rejected() {
        let p = ListingQueryParams {
            sort: Some("price".into()),
            ..params()
        };
        assert_eq!(p.parse().unwrap_err().get("sort"), Some("invalid sort value"));
    }

    #[test]
    fn descending_sort_is_parsed() {
        assert_eq!(Sort::parse("-updated"), Some(Sort::newest_first()));
        assert_eq!(Sort::parse("--updated"), None);
    }

    #[test]
    fn non_positive_paging_is_rejected() {
        let p = ListingQueryParams {
            page: Some("0".into()),
            page_size: Some("abc".into()),
            ..params()
        };
        let errors = p.parse().unwrap_err();
        assert_eq!(errors.get("page"), Some("must be greater than zero"));
        assert_eq!(errors.get("page_size"), Some("must be an integer value"));
    }

    #[test]
    fn page_size_is_capped() {
        let p = ListingQueryParams {
            page_size: Some("101".into()),
            ..params()
        };
        assert!(p.parse().unwrap_err().get("page_size").is_some());
    }

    #[test]
    fn tri_state_booleans() {
        let p = ListingQueryParams {
            featured: Some("true".into()),
            gp_managed: Some("false".into()),
            active: Some("yes".into()),
            ..params()
        };
        let errors = p.parse().unwrap_err();
        assert_eq!(errors.get("active"), Some("must be true or false"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn year_range_forms() {
        let parse = |raw: &str| {
            let p = ListingQueryParams {
                year: Some(raw.into()),
                ..params()
            };
            p.parse().map(|q| q.filter.year)
        };
        assert_eq!(
            parse("2015-2020").unwrap(),
            YearRange { start: Some(2015), end: Some(2020) }
        );
        assert_eq!(parse("2015-").unwrap(), YearRange { start: Some(2015), end: None });
        assert_eq!(parse("-2020").unwrap(), YearRange { start: None, end: Some(2020) });
        assert_eq!(
            parse("2018").unwrap(),
            YearRange { start: Some(2018), end: Some(2018) }
        );
        assert!(parse("2020-2015").is_err());
        assert!(parse("abc").is_err());
    }

    // -- predicates ------------------------------------------------------------

    #[test]
    fn predicates_follow_declared_column_order() {
        let filter = ListingFilter {
            make: Some(1),
            year: YearRange { start: Some(2010), end: Some(2020) },
            transmission_is_auto: Some(true),
            gp_managed: Some(false),
            ..ListingFilter::default()
        };
        let preds = filter.predicates();
        let columns: Vec<_> = preds.iter().map(|p| (p.column, p.op)).collect();
        assert_eq!(
            columns,
            vec![
                ("l.make", PredicateOp::Eq),
                ("l.year", PredicateOp::AtLeast),
                ("l.year", PredicateOp::AtMost),
                ("t.is_auto", PredicateOp::Eq),
                ("l.gp_managed", PredicateOp::Eq),
            ]
        );
        assert_eq!(preds[4].value, PredicateValue::Bool(false));
    }

    #[test]
    fn home_feed_sections_are_disjoint() {
        let featured = HomeFeedSection::Featured.query();
        let managed = HomeFeedSection::GpManaged.query();
        let recent = HomeFeedSection::Recent.query();
        assert_eq!(featured.filter.featured, Some(true));
        assert_eq!(managed.filter.gp_managed, Some(true));
        assert_eq!(recent.filter.featured, Some(false));
        assert_eq!(recent.filter.gp_managed, Some(false));
        for q in [featured, managed, recent] {
            assert_eq!(q.filter.active, Some(true));
            assert_eq!(q.page.limit(), HOME_FEED_PAGE_SIZE);
            assert_eq!(q.sort, Sort::newest_first());
        }
    }

    // -- metadata --------------------------------------------------------------

    #[test]
    fn offset_is_zero_based() {
        let page = PageRequest::new(3, 20).unwrap();
        assert_eq!(page.offset(), 40);
        assert_eq!(page.limit(), 20);
        assert!(PageRequest::new(0, 20).is_none());
    }

    #[test]
    fn last_page_rounds_up() {
        let meta = PageMetadata::calculate(41, PageRequest::new(2, 20).unwrap());
        assert_eq!(meta.last_page, 3);
        assert_eq!(meta.first_page, 1);
        assert_eq!(meta.current_page, 2);
        assert_eq!(meta.total_records, 41);
    }

    #[test]
    fn empty_result_metadata() {
        let meta = PageMetadata::calculate(0, PageRequest::default());
        assert_eq!(meta.first_page, 1);
        assert_eq!(meta.last_page, 0);
        assert_eq!(meta.total_records, 0);
    }
}
