use crate::{db::record::Record, error::InternalError};
use std::borrow::Cow;

///
/// TextKeyExtractor
///
/// Strategy reading a text lookup key out of a driving record.
///

pub trait TextKeyExtractor {
    /// Short label reported by explain.
    fn name(&self) -> &'static str;

    fn extract<'r>(
        &self,
        record: &'r dyn Record,
        column: usize,
    ) -> Result<Cow<'r, str>, InternalError>;
}

///
/// StrKey
/// Reads the `Str` representation.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct StrKey;

impl TextKeyExtractor for StrKey {
    fn name(&self) -> &'static str {
        "str"
    }

    fn extract<'r>(
        &self,
        record: &'r dyn Record,
        column: usize,
    ) -> Result<Cow<'r, str>, InternalError> {
        record.get_str(column).map(Cow::Borrowed)
    }
}

///
/// SymKey
/// Reads the `Symbol` representation.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct SymKey;

impl TextKeyExtractor for SymKey {
    fn name(&self) -> &'static str {
        "sym"
    }

    fn extract<'r>(
        &self,
        record: &'r dyn Record,
        column: usize,
    ) -> Result<Cow<'r, str>, InternalError> {
        record.get_sym(column).map(Cow::Borrowed)
    }
}

///
/// FnKey
/// Closure strategy, for keys derived from a record rather than read as-is.
///

pub struct FnKey<F> {
    name: &'static str,
    f: F,
}

impl<F> FnKey<F>
where
    F: for<'r> Fn(&'r dyn Record, usize) -> Result<Cow<'r, str>, InternalError>,
{
    pub const fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }
}

impl<F> TextKeyExtractor for FnKey<F>
where
    F: for<'r> Fn(&'r dyn Record, usize) -> Result<Cow<'r, str>, InternalError>,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn extract<'r>(
        &self,
        record: &'r dyn Record,
        column: usize,
    ) -> Result<Cow<'r, str>, InternalError> {
        (self.f)(record, column)
    }
}
