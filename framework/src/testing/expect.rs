//! Fluent assertions inspired by Jest's `expect`
//!
//! Failures print the matcher, the expected value and the received value
//! along with the call site captured by the [`expect!`](crate::expect) macro.

use std::fmt::Debug;

/// Value under assertion (use the `expect!` macro to build one)
pub struct Expect<T> {
    value: T,
    location: &'static str,
}

impl<T> Expect<T> {
    pub fn new(value: T, location: &'static str) -> Self {
        Self { value, location }
    }

    #[track_caller]
    fn fail(&self, matcher: &str, expected: impl Debug, received: impl Debug) -> ! {
        panic!(
            "\nassertion failed at {}\n  expect!(..).{}\n\n  Expected: {:?}\n  Received: {:?}\n",
            self.location, matcher, expected, received
        );
    }
}

impl<T: Debug + PartialEq> Expect<T> {
    pub fn to_equal(&self, expected: T) {
        if self.value != expected {
            self.fail("to_equal(expected)", &expected, &self.value);
        }
    }

    pub fn to_not_equal(&self, unexpected: T) {
        if self.value == unexpected {
            self.fail("to_not_equal(value)", format!("not {:?}", unexpected), &self.value);
        }
    }
}

impl<T: Debug + PartialOrd> Expect<T> {
    pub fn to_be_less_than_or_equal(&self, bound: T) {
        if self.value > bound {
            self.fail("to_be_less_than_or_equal(bound)", format!("<= {:?}", bound), &self.value);
        }
    }
}

impl Expect<bool> {
    pub fn to_be_true(&self) {
        if !self.value {
            self.fail("to_be_true()", true, false);
        }
    }

    pub fn to_be_false(&self) {
        if self.value {
            self.fail("to_be_false()", false, true);
        }
    }
}

impl<T: Debug> Expect<Option<T>> {
    pub fn to_be_some(&self) {
        if self.value.is_none() {
            self.fail("to_be_some()", "Some(_)", "None");
        }
    }

    pub fn to_be_none(&self) {
        if let Some(v) = &self.value {
            self.fail("to_be_none()", "None", format!("Some({:?})", v));
        }
    }
}

impl<T: Debug, E: Debug> Expect<Result<T, E>> {
    pub fn to_be_ok(&self) {
        if let Err(e) = &self.value {
            self.fail("to_be_ok()", "Ok(_)", format!("Err({:?})", e));
        }
    }

    pub fn to_be_err(&self) {
        if let Ok(v) = &self.value {
            self.fail("to_be_err()", "Err(_)", format!("Ok({:?})", v));
        }
    }
}

impl Expect<String> {
    pub fn to_contain(&self, substring: &str) {
        if !self.value.contains(substring) {
            self.fail("to_contain(substring)", substring, &self.value);
        }
    }
}

impl<T: Debug> Expect<Vec<T>> {
    pub fn to_have_length(&self, expected: usize) {
        if self.value.len() != expected {
            self.fail(
                "to_have_length(n)",
                format!("length {}", expected),
                format!("length {} {:?}", self.value.len(), self.value),
            );
        }
    }

    pub fn to_be_empty(&self) {
        if !self.value.is_empty() {
            self.fail("to_be_empty()", "[]", &self.value);
        }
    }
}

/// Build an [`Expect`] for a value, capturing the call site
///
/// ```rust,ignore
/// use kit::expect;
///
/// expect!(page.total).to_equal(3);
/// expect!(item.completed_at).to_be_some();
/// ```
#[macro_export]
macro_rules! expect {
    ($value:expr) => {
        $crate::testing::Expect::new($value, concat!(file!(), ":", line!()))
    };
}
