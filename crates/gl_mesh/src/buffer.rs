// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

use std::rc::Rc;

pub use self::{attribute::AttributeBuffer, index::IndexBuffer};
use gl::types::GLsizei;

use crate::{
	device::{BufferHandle, BufferTarget, Device},
	error::{ContractViolation, DeviceError},
};

pub mod attribute;
pub mod index;


/// Largest vertex or index count a single draw call can take
pub const MAX_DRAW_COUNT: usize = GLsizei::MAX as usize;

/// Byte size of `count` elements of `element_size` bytes each
///
/// Counts a draw call could not express are refused up front.
pub(crate) fn table_size(count: usize, element_size: usize) -> Result<usize, ContractViolation> {
	if count > MAX_DRAW_COUNT {
		return Err(ContractViolation::CountTooLarge {
			count,
			max: MAX_DRAW_COUNT,
		})
	}

	count.checked_mul(element_size).ok_or(ContractViolation::SizeOverflow)
}

/// Where a descriptor is in its one-way lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
	/// Metadata known, source still borrowed, nothing on the device
	Described,
	/// Source copied and uploaded, device buffer owned
	Created,
}

pub(crate) enum BufferState<'s> {
	Described { source: &'s [u8] },
	Created(DeviceBuffer),
}

/// A buffer living on the device together with the private copy
/// of the data uploaded to it.
///
/// Deleted on drop.
pub(crate) struct DeviceBuffer {
	device: Rc<dyn Device>,
	handle: BufferHandle,
	data: Box<[u8]>,
}

impl BufferState<'_> {
	#[inline]
	pub fn lifecycle(&self) -> Lifecycle {
		match self {
			Self::Described { .. } => Lifecycle::Described,
			Self::Created(_) => Lifecycle::Created,
		}
	}

	/// Bytes currently backing the descriptor, borrowed or owned
	#[inline]
	pub fn bytes(&self) -> &[u8] {
		match self {
			Self::Described { source } => source,
			Self::Created(buffer) => &buffer.data,
		}
	}

	#[inline]
	pub fn buffer(&self) -> Option<&DeviceBuffer> {
		match self {
			Self::Described { .. } => None,
			Self::Created(buffer) => Some(buffer),
		}
	}

	/// Drop the source borrow, only possible once created
	pub fn into_owned(self) -> Option<BufferState<'static>> {
		match self {
			Self::Described { .. } => None,
			Self::Created(buffer) => Some(BufferState::Created(buffer)),
		}
	}
}

impl DeviceBuffer {
	/// Copy `source` and upload the copy to a new buffer.
	///
	/// The new buffer is left bound to `target`.
	pub fn upload(
		device: Rc<dyn Device>,
		target: BufferTarget,
		source: &[u8],
	) -> Result<Self, DeviceError> {
		let data = Box::<[u8]>::from(source);
		let handle = device.create_buffer(target, &data)?;

		log::debug!("created {target:?} buffer {:?} ({} bytes)", handle.0, data.len());

		Ok(Self {
			device,
			handle,
			data,
		})
	}

	#[inline]
	pub fn handle(&self) -> BufferHandle {
		self.handle
	}

	#[inline]
	pub fn device(&self) -> &dyn Device {
		&*self.device
	}
}

impl Drop for DeviceBuffer {
	fn drop(&mut self) {
		log::debug!("deleting buffer {:?}", self.handle.0);
		self.device.delete_buffer(self.handle);
	}
}
