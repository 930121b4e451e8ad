#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// `var!("x5")` as a [`VarName`](crate::VarName); test-only shorthand.
#[cfg(test)]
macro_rules! var {
    ($name:literal) => {
        $name.parse::<$crate::VarName>().unwrap()
    };
}
