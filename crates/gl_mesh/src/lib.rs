// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

//! Descriptors for mesh buffers living on the GPU.
//!
//! An [`AttributeBuffer`] or [`IndexBuffer`] borrows a CPU table, copies
//! it once when created and owns the resulting device buffer. A
//! [`VertexArray`] owns one position attribute, any number of secondary
//! attributes and an optional index buffer, creates them in order and
//! issues draw calls for them.
//!
//! All device work goes through a [`Device`](device::Device), which must
//! only be used from the thread owning the graphics context.

pub mod buffer;
pub mod device;
pub mod error;
pub mod tables;
pub mod types;
pub mod vertex_array;

pub use buffer::{AttributeBuffer, IndexBuffer, Lifecycle, MAX_DRAW_COUNT};
pub use device::SharedDevice;
pub use error::{ContractViolation, DeviceError, MeshError, Rejected};
pub use tables::MeshTables;
pub use types::{IndexType, PrimitiveKind, ScalarType};
pub use vertex_array::{slots, VertexArray, DEFAULT_MAX_ATTRIBUTE_SLOTS};

#[cfg(test)]
pub(crate) fn init_test_logger() {
	let _ = env_logger::builder().is_test(true).try_init();
}
