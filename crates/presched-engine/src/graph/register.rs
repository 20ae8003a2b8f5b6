//! Register model for the liveness side of the dependence graph
//!
//! Registers are shared by reference among their users: the graph owns them,
//! instructions refer to them by [`RegId`], and each register tracks its
//! consumer list so live-range reasoning can scan "who else reads this".

use crate::graph::instruction::InstId;

/// Unique identifier for a register in a dependence graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegId(pub u32);

impl RegId {
    /// Index into the graph's register table
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for RegId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A virtual register: a type tag plus the instructions that read it
#[derive(Debug, Clone)]
pub struct Register {
    pub(crate) id: RegId,
    /// Register-class tag, 0..reg_type_count in the owning graph
    pub(crate) reg_type: u16,
    /// Instructions that use this register
    pub(crate) users: Vec<InstId>,
}

impl Register {
    pub(crate) fn new(id: RegId, reg_type: u16) -> Self {
        Register {
            id,
            reg_type,
            users: Vec::new(),
        }
    }

    /// This register's id
    #[inline]
    pub fn id(&self) -> RegId {
        self.id
    }

    /// Register-class tag
    #[inline]
    pub fn reg_type(&self) -> u16 {
        self.reg_type
    }

    /// Instructions that use this register
    #[inline]
    pub fn users(&self) -> &[InstId] {
        &self.users
    }
}
