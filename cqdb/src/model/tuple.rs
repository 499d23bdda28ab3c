//! Tuples flowing through the operator pipeline.

use std::fmt::{Display, Formatter};

use super::term::Constant;

/// An ordered sequence of constants, one per column of the relational atoms
/// the producing operator is labeled with.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Tuple(Vec<Constant>);

impl Tuple {
    /// Construct a new [Tuple] from the given constants.
    pub fn new(constants: Vec<Constant>) -> Self {
        Self(constants)
    }

    /// Construct the empty [Tuple].
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Construct the concatenation of two tuples.
    pub fn joined(left: &Tuple, right: &Tuple) -> Self {
        let mut constants = Vec::with_capacity(left.0.len() + right.0.len());
        constants.extend_from_slice(&left.0);
        constants.extend_from_slice(&right.0);
        Self(constants)
    }

    /// Return the constants of the tuple.
    pub fn constants(&self) -> &[Constant] {
        &self.0
    }

    /// Return the number of constants in the tuple.
    pub fn arity(&self) -> usize {
        self.0.len()
    }

    /// Return `true` if the tuple has no constants.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for Tuple {
    /// Formats the tuple as its output line: values separated by a comma and
    /// a space, strings without their surrounding quotes.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, constant) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            match constant {
                Constant::Integer(value) => write!(f, "{value}")?,
                Constant::String(value) => f.write_str(value)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_strips_quotes() {
        let tuple = Tuple::new(vec![
            Constant::String("anna".to_string()),
            Constant::Integer(3),
        ]);
        assert_eq!(tuple.to_string(), "anna, 3");
    }

    #[test]
    fn joined_concatenates() {
        let left = Tuple::new(vec![Constant::Integer(1)]);
        let right = Tuple::new(vec![Constant::Integer(2), Constant::Integer(3)]);

        let joined = Tuple::joined(&left, &right);
        assert_eq!(joined.arity(), 3);
        assert_eq!(joined.to_string(), "1, 2, 3");
    }
}
