// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Declaration modifiers.

use std::ops::{BitOr, BitOrAssign};

/// A set of declaration modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u32);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const PRIVATE: Modifiers = Modifiers(1 << 0);
    pub const INTERNAL: Modifiers = Modifiers(1 << 1);
    pub const PROTECTED: Modifiers = Modifiers(1 << 2);
    pub const PUBLIC: Modifiers = Modifiers(1 << 3);
    pub const ABSTRACT: Modifiers = Modifiers(1 << 4);
    pub const VIRTUAL: Modifiers = Modifiers(1 << 5);
    pub const SEALED: Modifiers = Modifiers(1 << 6);
    pub const STATIC: Modifiers = Modifiers(1 << 7);
    pub const OVERRIDE: Modifiers = Modifiers(1 << 8);
    pub const READONLY: Modifiers = Modifiers(1 << 9);
    pub const CONST: Modifiers = Modifiers(1 << 10);
    pub const NEW: Modifiers = Modifiers(1 << 11);
    pub const PARTIAL: Modifiers = Modifiers(1 << 12);
    pub const EXTERN: Modifiers = Modifiers(1 << 13);
    pub const VOLATILE: Modifiers = Modifiers(1 << 14);
    pub const UNSAFE: Modifiers = Modifiers(1 << 15);
    pub const ASYNC: Modifiers = Modifiers(1 << 16);

    /// Every single modifier, in the order they are written.
    const ORDERED: [(Modifiers, &'static str); 17] = [
        (Modifiers::PUBLIC, "public"),
        (Modifiers::PROTECTED, "protected"),
        (Modifiers::PRIVATE, "private"),
        (Modifiers::INTERNAL, "internal"),
        (Modifiers::NEW, "new"),
        (Modifiers::UNSAFE, "unsafe"),
        (Modifiers::ABSTRACT, "abstract"),
        (Modifiers::VIRTUAL, "virtual"),
        (Modifiers::SEALED, "sealed"),
        (Modifiers::STATIC, "static"),
        (Modifiers::OVERRIDE, "override"),
        (Modifiers::READONLY, "readonly"),
        (Modifiers::VOLATILE, "volatile"),
        (Modifiers::EXTERN, "extern"),
        (Modifiers::PARTIAL, "partial"),
        (Modifiers::CONST, "const"),
        (Modifiers::ASYNC, "async"),
    ];

    pub fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The single modifiers contained in this set, in written order.
    pub fn iter(self) -> impl Iterator<Item = Modifiers> {
        Self::ORDERED
            .iter()
            .filter(move |(m, _)| self.contains(*m))
            .map(|(m, _)| *m)
    }

    /// The keyword of a single modifier; empty for a set of several.
    pub fn keyword(self) -> &'static str {
        Self::ORDERED
            .iter()
            .find(|(m, _)| *m == self)
            .map(|(_, kw)| *kw)
            .unwrap_or("")
    }

    /// The single modifier written as `keyword`.
    pub fn from_keyword(keyword: &str) -> Option<Modifiers> {
        Self::ORDERED
            .iter()
            .find(|(_, kw)| *kw == keyword)
            .map(|(m, _)| *m)
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Modifiers) {
        self.0 |= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_iterate_in_written_order() {
        let mods = Modifiers::STATIC | Modifiers::PUBLIC | Modifiers::ASYNC;
        let words: Vec<_> = mods.iter().map(Modifiers::keyword).collect();
        assert_eq!(words, vec!["public", "static", "async"]);
        assert_eq!(Modifiers::from_keyword("static"), Some(Modifiers::STATIC));
    }

    #[test]
    fn test_contains() {
        let mods = Modifiers::PRIVATE | Modifiers::READONLY;
        assert!(mods.contains(Modifiers::READONLY));
        assert!(!mods.contains(Modifiers::STATIC));
        assert!(Modifiers::NONE.is_empty());
    }
}
