/// Test modules for forge-tables
///
/// Tests are organized into logical groupings:
/// - catalog: record shapes, rendering and registry ordering
/// - write_out: draining a populated registry into a store
mod catalog;
mod write_out;
