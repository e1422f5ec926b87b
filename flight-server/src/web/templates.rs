//! Askama templates and their view models.
//!
//! The page is a pure projection of the current query and result set:
//! decoded leg fields, range label, and sort/page hrefs are all
//! recomputed per render from the same pure helpers the query
//! controller uses, never cached.

use askama::Template;
use chrono::NaiveDate;

use crate::controller::range_label;
use crate::domain::{FlightQuery, FlightRow, SearchResult, SortKey};
use crate::legs;

/// Flight table page.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    // Form echoes ("" when the field has no constraint)
    pub origin: String,
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    pub min_price: String,
    pub max_price: String,

    // Hidden form state so a new search keeps the current sort
    pub sort_by: String,
    pub order: String,

    // Sortable column headers
    pub depart_sort: SortLink,
    pub return_sort: SortLink,
    pub price_sort: SortLink,

    pub flights: Vec<FlightView>,
    pub total: u64,
    pub range: String,

    pub has_prev: bool,
    pub prev_href: String,
    pub has_next: bool,
    pub next_href: String,
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
}

/// A sortable column header.
#[derive(Debug, Clone)]
pub struct SortLink {
    /// Page href with the sort state a click leads to
    pub href: String,

    /// Whether the table is currently sorted by this column
    pub active: bool,

    /// Direction indicator for the active column ("" otherwise)
    pub arrow: String,
}

impl SortLink {
    /// Build the header link for `key` given the current query.
    fn build(query: &FlightQuery, key: SortKey) -> Self {
        let (sort_by, order) = query.toggled(key);
        let target = FlightQuery {
            sort_by,
            order,
            ..query.clone()
        };

        let active = query.sort_by == key;
        let arrow = if active {
            match query.order {
                crate::domain::SortOrder::Asc => "↑".to_string(),
                crate::domain::SortOrder::Desc => "↓".to_string(),
            }
        } else {
            String::new()
        };

        SortLink {
            href: page_href(&target),
            active,
            arrow,
        }
    }
}

/// Flight row view model: every display field pre-rendered.
#[derive(Debug, Clone)]
pub struct FlightView {
    pub origin: String,
    pub destination: String,
    pub depart_date: String,
    pub return_date: String,
    pub depart_time: String,
    pub return_time: String,
    pub depart_duration: String,
    pub return_duration: String,
    pub outbound_stops: String,
    pub return_stops: String,
    pub price: String,
    pub booking_link: String,
}

impl FlightView {
    /// Project a result row into display fields, decoding the leg
    /// strings on the way.
    pub fn from_row(row: &FlightRow) -> Self {
        FlightView {
            origin: row.origin.clone(),
            destination: row.destination.clone(),
            depart_date: format_date(&row.depart_date),
            return_date: format_date(&row.return_date),
            depart_time: legs::decode_time_of_day(&row.outbound_legs).unwrap_or_default(),
            return_time: legs::decode_time_of_day(&row.return_legs).unwrap_or_default(),
            depart_duration: legs::decode_duration(&row.outbound_legs).unwrap_or_default(),
            return_duration: legs::decode_duration(&row.return_legs).unwrap_or_default(),
            outbound_stops: legs::stops_label(legs::count_stops(&row.outbound_legs)),
            return_stops: legs::stops_label(legs::count_stops(&row.return_legs)),
            price: row
                .price_total
                .as_deref()
                .map(|p| format!("${p}"))
                .unwrap_or_else(|| "—".to_string()),
            booking_link: row.united_booking_link.clone(),
        }
    }
}

impl IndexTemplate {
    /// Build the page model for a query and its result set.
    pub fn build(query: &FlightQuery, result: &SearchResult) -> Self {
        let echo = |field: &Option<String>| field.clone().unwrap_or_default();

        let prev_href = query
            .prev_offset()
            .map(|offset| page_href(&FlightQuery { offset, ..query.clone() }));
        let next_href = query
            .next_offset(result.total)
            .map(|offset| page_href(&FlightQuery { offset, ..query.clone() }));

        IndexTemplate {
            origin: echo(&query.origin),
            destination: echo(&query.destination),
            start_date: echo(&query.start_date),
            end_date: echo(&query.end_date),
            min_price: echo(&query.min_price),
            max_price: echo(&query.max_price),
            sort_by: query.sort_by.as_str().to_string(),
            order: query.order.as_str().to_string(),
            depart_sort: SortLink::build(query, SortKey::DepartDate),
            return_sort: SortLink::build(query, SortKey::ReturnDate),
            price_sort: SortLink::build(query, SortKey::PriceTotal),
            flights: result.rows.iter().map(FlightView::from_row).collect(),
            total: result.total,
            range: range_label(query.offset, query.limit, result.total),
            has_prev: prev_href.is_some(),
            prev_href: prev_href.unwrap_or_default(),
            has_next: next_href.is_some(),
            next_href: next_href.unwrap_or_default(),
        }
    }
}

/// Serialize a query into a page href, percent-encoded.
fn page_href(query: &FlightQuery) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (name, value) in query.to_params() {
        serializer.append_pair(name, &value);
    }
    format!("/?{}", serializer.finish())
}

/// Render an ISO date as "Jan 10"; anything unparsable passes through.
fn format_date(iso: &str) -> String {
    NaiveDate::parse_from_str(iso, "%Y-%m-%d")
        .map(|d| d.format("%b %d").to_string())
        .unwrap_or_else(|_| iso.to_string())
}
