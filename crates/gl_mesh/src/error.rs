// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

use std::fmt;

use thiserror::Error;

/// Misuse of a descriptor. Always reported before anything is mutated
/// or allocated on the device.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
	#[error("table is empty (count must be > 0)")]
	EmptyTable,
	#[error("tuple width {0} is not 2, 3 or 4")]
	BadTupleWidth(u32),
	#[error("source holds {actual} bytes, expected {expected}")]
	SourceLength { expected: usize, actual: usize },
	#[error("{len} scalars do not split into tuples of {width}")]
	RaggedTuples { len: usize, width: u32 },
	#[error("device object was already created")]
	AlreadyCreated,
	#[error("device object has not been created yet")]
	NotCreated,
	#[error("slot {0} is reserved for vertex positions")]
	ReservedSlot(u32),
	#[error("position attribute must use slot 0, got {0}")]
	PositionSlot(u32),
	#[error("slot {slot} is out of range (vertex array has {max} slots)")]
	SlotOutOfRange { slot: u32, max: u32 },
	#[error("slot {0} is already occupied")]
	SlotOccupied(u32),
	#[error("slot {0} has no attribute")]
	SlotNotOwned(u32),
	#[error("the position attribute cannot be disabled")]
	PositionLocked,
	#[error("vertex array already has an index buffer")]
	IndexBufferPresent,
	#[error("vertex array composition is locked once created")]
	CompositionLocked,
	#[error("attribute in slot {slot} has {actual} tuples, vertex array has {expected} vertices")]
	CountMismatch { slot: u32, expected: usize, actual: usize },
	#[error("a vertex array needs at least one attribute slot")]
	NoSlots,
	#[error("mesh tables hold both 2d and 3d positions")]
	BothPositionTables,
	#[error("mesh tables hold no positions")]
	NoPositionTable,
	#[error("mesh tables hold both triangles and indices")]
	BothIndexTables,
	#[error("mesh table `{table}` has {actual} entries, expected 0 or {expected}")]
	TableLength { table: &'static str, expected: usize, actual: usize },
	#[error("count {count} exceeds the largest drawable count {max}")]
	CountTooLarge { count: usize, max: usize },
	#[error("table size in bytes does not fit in memory")]
	SizeOverflow,
}

/// A descriptor refused by a vertex array, handed back unchanged
/// together with the reason.
#[derive(Error)]
#[error("{violation}")]
pub struct Rejected<T> {
	pub violation: ContractViolation,
	pub descriptor: T,
}

impl<T> Rejected<T> {
	#[inline]
	pub fn violation(&self) -> &ContractViolation {
		&self.violation
	}

	#[inline]
	pub fn into_descriptor(self) -> T {
		self.descriptor
	}
}

// descriptors own device buffers and are not Debug themselves
impl<T> fmt::Debug for Rejected<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Rejected").field("violation", &self.violation).finish_non_exhaustive()
	}
}

impl<T> From<Rejected<T>> for ContractViolation {
	fn from(rejected: Rejected<T>) -> Self {
		rejected.violation
	}
}

/// Failure reported by the graphics device itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
	#[error("could not create {0} (driver returned name 0)")]
	CouldNotCreate(&'static str),
	#[error("driver is out of memory")]
	OutOfMemory,
	#[error("driver reported error {0:#06x}")]
	Driver(u32),
	#[error("vertex array needs {requested} attribute slots, driver supports {supported}")]
	AttributeLimit { requested: u32, supported: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
	#[error("contract violation: {0}")]
	Contract(#[from] ContractViolation),
	#[error("device error: {0}")]
	Device(#[from] DeviceError),
}

impl MeshError {
	#[inline]
	pub fn is_contract_violation(&self) -> bool {
		matches!(self, Self::Contract(_))
	}

	pub fn contract(&self) -> Option<&ContractViolation> {
		match self {
			Self::Contract(violation) => Some(violation),
			Self::Device(_) => None,
		}
	}
}
