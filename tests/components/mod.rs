//! Integration tests for the Voigt component

mod pes_voigt_tests;
mod voigt_tests;
