use std::fmt;

/// The formula AST produced by the parser: a tagged tree with an owned
/// child (negation) or owned child sequence (conjunction/disjunction), per
/// the design notes — no inheritance hierarchy, one enum shared by every
/// stage that needs to look like a formula, including the normalizer's own
/// intermediate trees.
#[derive(Debug, Clone, PartialEq)]
pub enum Formula {
    Atom(String),
    Not(Box<Formula>),
    And(Vec<Formula>),
    Or(Vec<Formula>),
    Implies(Box<Formula>, Box<Formula>),
    Iff(Box<Formula>, Box<Formula>),
    True,
    False,
}

impl Formula {
    pub fn atom(name: impl Into<String>) -> Formula {
        Formula::Atom(name.into())
    }

    pub fn not(f: Formula) -> Formula {
        Formula::Not(Box::new(f))
    }

    pub fn and(children: Vec<Formula>) -> Formula {
        Formula::And(children)
    }

    pub fn or(children: Vec<Formula>) -> Formula {
        Formula::Or(children)
    }

    pub fn implies(a: Formula, b: Formula) -> Formula {
        Formula::Implies(Box::new(a), Box::new(b))
    }

    pub fn iff(a: Formula, b: Formula) -> Formula {
        Formula::Iff(Box::new(a), Box::new(b))
    }

    /// Collects every distinct atom name appearing in the formula, in
    /// first-occurrence order. Used to build the numeric clause model's
    /// atom-to-id mapping.
    pub fn atoms(&self) -> Vec<String> {
        let mut seen = Vec::new();
        self.collect_atoms(&mut seen);
        seen
    }

    fn collect_atoms(&self, seen: &mut Vec<String>) {
        match self {
            Formula::Atom(name) => {
                if !seen.contains(name) {
                    seen.push(name.clone());
                }
            }
            Formula::Not(child) => child.collect_atoms(seen),
            Formula::And(children) | Formula::Or(children) => {
                for child in children {
                    child.collect_atoms(seen);
                }
            }
            Formula::Implies(a, b) | Formula::Iff(a, b) => {
                a.collect_atoms(seen);
                b.collect_atoms(seen);
            }
            Formula::True | Formula::False => {}
        }
    }

    /// The structural-complexity score used by the Tseitin gate (spec §4.2):
    /// 1 for atoms, `1 + score(child)` for negation, and
    /// `1 + sum(scores) + penalty` for n-ary And/Or where `penalty = n` if
    /// `n > 2`, else 0.
    pub fn complexity(&self) -> usize {
        match self {
            Formula::Atom(_) | Formula::True | Formula::False => 1,
            Formula::Not(child) => 1 + child.complexity(),
            Formula::And(children) | Formula::Or(children) => {
                let penalty = if children.len() > 2 { children.len() } else { 0 };
                1 + children.iter().map(Formula::complexity).sum::<usize>() + penalty
            }
            Formula::Implies(a, b) | Formula::Iff(a, b) => 1 + a.complexity() + b.complexity(),
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Atom(name) => write!(f, "{}", name),
            Formula::Not(child) => write!(f, "!({})", child),
            Formula::And(children) => {
                write!(f, "(")?;
                for (i, c) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " & ")?;
                    }
                    write!(f, "{}", c)?;
                }
                write!(f, ")")
            }
            Formula::Or(children) => {
                write!(f, "(")?;
                for (i, c) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", c)?;
                }
                write!(f, ")")
            }
            Formula::Implies(a, b) => write!(f, "({} -> {})", a, b),
            Formula::Iff(a, b) => write!(f, "({} <-> {})", a, b),
            Formula::True => write!(f, "top"),
            Formula::False => write!(f, "bottom"),
        }
    }
}
