pub mod alert;
pub mod page_header;
pub mod paged_table;
pub mod pagination_controls;
pub mod stat_card;
pub mod status_badge;
