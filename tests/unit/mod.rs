mod basic_tests;
mod projections;
