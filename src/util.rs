use std::fmt::{self, Display};

macro_rules! try_match {
    ($scrutinee:expr, $pattern:pat => $map:expr) => {
        match ($scrutinee) {
            $pattern => Some($map),
            _ => None,
        }
    };
}

pub(crate) use try_match;

pub fn format_iter<'a, T, I, II>(values: II, conj: &'a str, on_empty: &'a str) -> impl Display
where
    T: Display,
    I: Iterator<Item = T> + Clone,
    II: IntoIterator<Item = T, IntoIter = I>,
{
    struct IterFormatter<'a, I> {
        iter: I,
        conj: &'a str,
        on_empty: &'a str,
    }

    impl<I, T> Display for IterFormatter<'_, I>
    where
        T: Display,
        I: Iterator<Item = T> + Clone,
    {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let mut iter = self.iter.clone();

            let Some(first) = iter.next() else {
                return self.on_empty.fmt(f);
            };

            let Some(second) = iter.next() else {
                return first.fmt(f);
            };

            match iter.next() {
                None => write!(f, "{first} {} {second}", self.conj),

                Some(mut prev) => {
                    write!(f, "{first}, {second}")?;

                    for v in iter {
                        write!(f, ", {prev}")?;
                        prev = v;
                    }

                    write!(f, " {} {prev}", self.conj)
                }
            }
        }
    }

    IterFormatter {
        iter: values.into_iter(),
        conj,
        on_empty,
    }
}

/// Wraps the value in double quotes, the way outcome lines quote lexemes.
pub fn quoted<T: Display>(value: T) -> impl Display {
    struct Quoted<T>(T);

    impl<T: Display> Display for Quoted<T> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "\"{}\"", self.0)
        }
    }

    Quoted(value)
}
