//! The canonical search query and its delta-merge machinery.
//!
//! A `FlightQuery` is an immutable value: every change produces a new
//! query by merging a `QueryDelta` over the current one. Optional filter
//! fields use the three-state `Patch` so a delta can distinguish "leave
//! this field alone" from "remove this constraint" — an absent field
//! means no constraint, never an empty-string constraint.

use serde::{Deserialize, Serialize};

/// Default page size for the interactive client.
pub const DEFAULT_LIMIT: u32 = 100;

/// Column a result set can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    DepartDate,
    ReturnDate,
    PriceTotal,
}

impl SortKey {
    /// Wire name of the sort key.
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::DepartDate => "depart_date",
            SortKey::ReturnDate => "return_date",
            SortKey::PriceTotal => "price_total",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Wire name of the direction.
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Three-state override for an optional query field.
///
/// `Keep` leaves the current value untouched, `Set` replaces it, and
/// `Clear` removes the constraint entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Keep,
    Set(T),
    Clear,
}

impl<T: Clone> Patch<T> {
    /// Apply this patch over the current field value.
    pub fn apply(&self, current: &Option<T>) -> Option<T> {
        match self {
            Patch::Keep => current.clone(),
            Patch::Set(v) => Some(v.clone()),
            Patch::Clear => None,
        }
    }
}

impl Patch<String> {
    /// Build a patch from a text-field edit: blank input clears the
    /// constraint, anything else sets the trimmed text.
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            Patch::Clear
        } else {
            Patch::Set(trimmed.to_string())
        }
    }
}

/// The canonical, immutable search query.
///
/// Hash/Eq make the canonical query usable as a cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlightQuery {
    /// Origin airport code filter (uppercased free text)
    pub origin: Option<String>,

    /// Destination airport code filter (uppercased free text)
    pub destination: Option<String>,

    /// Earliest outbound date, ISO `YYYY-MM-DD` inclusive
    pub start_date: Option<String>,

    /// Latest return date, ISO `YYYY-MM-DD` inclusive
    pub end_date: Option<String>,

    /// Minimum total price (numeric text, unvalidated here)
    pub min_price: Option<String>,

    /// Maximum total price (numeric text, unvalidated here)
    pub max_price: Option<String>,

    /// Sort column
    pub sort_by: SortKey,

    /// Sort direction
    pub order: SortOrder,

    /// First row index of the requested page
    pub offset: u32,

    /// Page size
    pub limit: u32,
}

impl Default for FlightQuery {
    fn default() -> Self {
        Self {
            origin: None,
            destination: None,
            start_date: None,
            end_date: None,
            min_price: None,
            max_price: None,
            sort_by: SortKey::DepartDate,
            order: SortOrder::Asc,
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl FlightQuery {
    /// Field-wise override: produce the query that results from applying
    /// `delta` over `self`. Merging an empty delta is the identity.
    pub fn merge(&self, delta: &QueryDelta) -> FlightQuery {
        FlightQuery {
            origin: delta.origin.apply(&self.origin),
            destination: delta.destination.apply(&self.destination),
            start_date: delta.start_date.apply(&self.start_date),
            end_date: delta.end_date.apply(&self.end_date),
            min_price: delta.min_price.apply(&self.min_price),
            max_price: delta.max_price.apply(&self.max_price),
            sort_by: delta.sort_by.unwrap_or(self.sort_by),
            order: delta.order.unwrap_or(self.order),
            offset: delta.offset.unwrap_or(self.offset),
            limit: delta.limit.unwrap_or(self.limit),
        }
    }

    /// The sort state a click on `key`'s header leads to: clicking the
    /// current column flips the direction, selecting a new column always
    /// enters ascending.
    pub fn toggled(&self, key: SortKey) -> (SortKey, SortOrder) {
        if self.sort_by == key {
            (key, self.order.toggled())
        } else {
            (key, SortOrder::Asc)
        }
    }

    /// Offset of the next page, or `None` when the current page already
    /// reaches `total`.
    pub fn next_offset(&self, total: u64) -> Option<u32> {
        if u64::from(self.offset) + u64::from(self.limit) >= total {
            None
        } else {
            Some(self.offset + self.limit)
        }
    }

    /// Offset of the previous page, or `None` when already on the first.
    /// Never produces a negative offset.
    pub fn prev_offset(&self) -> Option<u32> {
        if self.offset == 0 {
            None
        } else {
            Some(self.offset.saturating_sub(self.limit))
        }
    }

    /// Serialize for the wire: every present field as a string-valued
    /// parameter under its wire name, absent fields omitted entirely.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(10);

        let optional = [
            ("origin", &self.origin),
            ("destination", &self.destination),
            ("start_date", &self.start_date),
            ("end_date", &self.end_date),
            ("min_price", &self.min_price),
            ("max_price", &self.max_price),
        ];
        for (name, value) in optional {
            if let Some(v) = value {
                params.push((name, v.clone()));
            }
        }

        params.push(("sort_by", self.sort_by.as_str().to_string()));
        params.push(("order", self.order.as_str().to_string()));
        params.push(("offset", self.offset.to_string()));
        params.push(("limit", self.limit.to_string()));
        params
    }
}

/// A partial set of query field overrides.
///
/// Filter fields distinguish keep/set/clear; the always-present fields
/// (`sort_by`, `order`, `offset`, `limit`) use `None` for keep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryDelta {
    pub origin: Patch<String>,
    pub destination: Patch<String>,
    pub start_date: Patch<String>,
    pub end_date: Patch<String>,
    pub min_price: Patch<String>,
    pub max_price: Patch<String>,
    pub sort_by: Option<SortKey>,
    pub order: Option<SortOrder>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

impl QueryDelta {
    /// Delta that only moves the page offset.
    pub fn page(offset: u32) -> Self {
        QueryDelta {
            offset: Some(offset),
            ..QueryDelta::default()
        }
    }

    /// Delta that only changes the sort state.
    pub fn sort(sort_by: SortKey, order: SortOrder) -> Self {
        QueryDelta {
            sort_by: Some(sort_by),
            order: Some(order),
            ..QueryDelta::default()
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_opt_field() -> impl Strategy<Value = Option<String>> {
        proptest::option::of("[A-Z0-9-]{1,12}")
    }

    fn arb_query() -> impl Strategy<Value = FlightQuery> {
        (
            arb_opt_field(),
            arb_opt_field(),
            arb_opt_field(),
            arb_opt_field(),
            prop_oneof![
                Just(SortKey::DepartDate),
                Just(SortKey::ReturnDate),
                Just(SortKey::PriceTotal)
            ],
            prop_oneof![Just(SortOrder::Asc), Just(SortOrder::Desc)],
            0u32..10_000,
            1u32..500,
        )
            .prop_map(
                |(origin, destination, start_date, max_price, sort_by, order, offset, limit)| {
                    FlightQuery {
                        origin,
                        destination,
                        start_date,
                        end_date: None,
                        min_price: None,
                        max_price,
                        sort_by,
                        order,
                        offset,
                        limit,
                    }
                },
            )
    }

    proptest! {
        /// Merging the empty delta never changes the query.
        #[test]
        fn empty_delta_is_identity(q in arb_query()) {
            prop_assert_eq!(q.merge(&QueryDelta::default()), q);
        }

        /// Toggling the same header twice returns to the original order.
        #[test]
        fn double_toggle_restores_order(q in arb_query()) {
            let (key, order1) = q.toggled(q.sort_by);
            let after_first = FlightQuery { sort_by: key, order: order1, ..q.clone() };
            let (_, order2) = after_first.toggled(q.sort_by);
            prop_assert_eq!(order2, q.order);
        }

        /// prev_offset never underflows.
        #[test]
        fn prev_offset_never_negative(q in arb_query()) {
            if let Some(prev) = q.prev_offset() {
                prop_assert!(prev < q.offset);
            }
        }

        /// Absent fields never appear in the serialized parameters.
        #[test]
        fn params_only_present_fields(q in arb_query()) {
            let params = q.to_params();
            for (name, value) in &params {
                prop_assert!(!value.is_empty(), "{} serialized as empty string", name);
            }
            prop_assert_eq!(
                params.iter().filter(|(n, _)| *n == "end_date").count(),
                0
            );
        }
    }
}
