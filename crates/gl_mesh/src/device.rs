// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

use std::{num::NonZeroU32, rc::Rc};

use gl::types::GLenum;

pub use self::opengl::GlDevice;
#[cfg(any(test, feature = "recording"))]
pub use self::recording::RecordingDevice;
use crate::{
	error::DeviceError,
	types::{IndexType, PrimitiveKind, ScalarType},
};

pub mod opengl;
#[cfg(any(test, feature = "recording"))]
pub mod recording;

/// Name of a buffer object on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(pub NonZeroU32);

/// Name of a vertex array object on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexArrayHandle(pub NonZeroU32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
	/// Per-vertex attribute data
	Attribute,
	/// Element indices of the bound vertex array
	Index,
}

impl BufferTarget {
	#[inline]
	pub fn gl_target(&self) -> GLenum {
		match self {
			Self::Attribute => gl::ARRAY_BUFFER,
			Self::Index => gl::ELEMENT_ARRAY_BUFFER,
		}
	}
}

/// The graphics API calls descriptors are built from.
///
/// Implementations are tied to the thread owning the graphics context,
/// descriptors hold them behind an `Rc` so they stay on that thread.
pub trait Device {
	/// Create a buffer and upload `data` to it in one shot.
	///
	/// The new buffer is left bound to `target`.
	fn create_buffer(&self, target: BufferTarget, data: &[u8])
		-> Result<BufferHandle, DeviceError>;
	fn delete_buffer(&self, buffer: BufferHandle);
	fn bind_buffer(&self, target: BufferTarget, buffer: BufferHandle);
	fn create_vertex_array(&self) -> Result<VertexArrayHandle, DeviceError>;
	fn delete_vertex_array(&self, vertex_array: VertexArrayHandle);
	/// Bind a vertex array, or unbind with `None`
	fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>);
	/// Source attribute `slot` from the buffer bound to [`BufferTarget::Attribute`]
	fn attribute_pointer(&self, slot: u32, tuple_width: u32, scalar_type: ScalarType);
	fn set_attribute_enabled(&self, slot: u32, enabled: bool);
	fn draw_arrays(&self, kind: PrimitiveKind, count: usize);
	fn draw_elements(&self, kind: PrimitiveKind, count: usize, index_type: IndexType);
	/// Number of attribute slots a vertex array may use on this device
	fn max_attribute_slots(&self) -> u32;
}

/// Anything a descriptor can take shared ownership of a [`Device`] from,
/// either a concrete `Rc<D>` or an already erased `Rc<dyn Device>`.
pub trait SharedDevice {
	fn shared(&self) -> Rc<dyn Device>;
}

impl<D: Device + 'static> SharedDevice for Rc<D> {
	#[inline]
	fn shared(&self) -> Rc<dyn Device> {
		self.clone()
	}
}

impl SharedDevice for Rc<dyn Device> {
	#[inline]
	fn shared(&self) -> Rc<dyn Device> {
		self.clone()
	}
}
