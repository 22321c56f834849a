mod query_tests;
mod reconcile_tests;
