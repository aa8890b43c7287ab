//! Flutter bridge surface for the Folio core.

pub mod api;
