//! Unit tests for the could-be oracle and its reference host
//!
//! Matcher tests build graphs node by node; lowering and façade tests go
//! through declaration fixtures.

mod test_property_based;
