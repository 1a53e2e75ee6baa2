use crate::geom::Vec2;
use thiserror::Error;

/// Discrete edit from the input collaborator. Every command triggers a full
/// recompute before the apply call returns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditCommand {
    Reset,
    SetDataWidth(i64),
    SetNumRegs(i64),
    SetNumAlus(i64),
    AddAlu,
    RemoveAlu,
    Move { name: String, to: Vec2 },
    Rotate { name: String },
    AddBlockage { name: String, center: Vec2, hsize: i32, vsize: i32 },
    Remove { name: String },
    Recompute,
}

/// Command-boundary rejection. The layout is left untouched; this is user
/// input being refused, not a broken invariant.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("no component named '{0}'")]
    UnknownComponent(String),
    #[error("component name '{0}' already in use")]
    DuplicateName(String),
    #[error("'{0}' is part of the circuit and cannot be removed by name")]
    NotRemovable(String),
    #[error("blockage half-extents must be non-negative, got ({0}, {1})")]
    BadExtent(i32, i32),
}
