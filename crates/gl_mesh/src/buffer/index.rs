// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

use glam::UVec3;

use super::{table_size, BufferState, DeviceBuffer, Lifecycle};
use crate::{
	device::{BufferHandle, BufferTarget, SharedDevice},
	error::{ContractViolation, MeshError},
	types::{IndexElement, IndexType},
};

/// Index table of a mesh, uploaded to the element array target
pub struct IndexBuffer<'s> {
	index_type: IndexType,
	count: usize,
	state: BufferState<'s>,
}

impl<'s> IndexBuffer<'s> {
	/// Describe an index table from raw bytes
	///
	/// `source` must hold exactly `count` indices of `index_type`.
	pub fn from_raw(
		index_type: IndexType,
		count: usize,
		source: &'s [u8],
	) -> Result<Self, ContractViolation> {
		let indices = Self {
			index_type,
			count,
			state: BufferState::Described { source },
		};

		indices.validate()?;
		Ok(indices)
	}

	pub fn new<T: IndexElement>(source: &'s [T]) -> Result<Self, ContractViolation> {
		Self::from_raw(T::INDEX_TYPE, source.len(), bytemuck::cast_slice(source))
	}

	/// Describe a triangle list, flattened in triangle order
	pub fn from_triangles(source: &'s [UVec3]) -> Result<Self, ContractViolation> {
		Self::new::<u32>(bytemuck::cast_slice(source))
	}

	pub fn validate(&self) -> Result<(), ContractViolation> {
		if self.count == 0 {
			return Err(ContractViolation::EmptyTable)
		}

		let expected = table_size(self.count, self.index_type.size())?;
		let actual = self.state.bytes().len();
		if actual != expected {
			return Err(ContractViolation::SourceLength { expected, actual })
		}

		Ok(())
	}

	/// Copy the source, upload it and bind it as the element buffer
	/// of the currently bound vertex array.
	///
	/// Can only succeed once.
	pub fn create<D: SharedDevice + ?Sized>(&mut self, device: &D) -> Result<(), MeshError> {
		let source = match &self.state {
			BufferState::Described { source } => *source,
			BufferState::Created(_) => return Err(ContractViolation::AlreadyCreated.into()),
		};
		self.validate()?;

		// uploading through the element target binds it to the current vertex array
		let buffer = DeviceBuffer::upload(device.shared(), BufferTarget::Index, source)?;
		self.state = BufferState::Created(buffer);

		Ok(())
	}

	/// Bind the already created buffer to the current vertex array
	pub(crate) fn attach(&self) -> Result<(), ContractViolation> {
		let buffer = self.state.buffer().ok_or(ContractViolation::NotCreated)?;
		buffer.device().bind_buffer(BufferTarget::Index, buffer.handle());
		Ok(())
	}

	/// Release the borrow of the source table, see
	/// [`AttributeBuffer::into_owned`](super::AttributeBuffer::into_owned)
	pub fn into_owned(self) -> Result<IndexBuffer<'static>, ContractViolation> {
		Ok(IndexBuffer {
			index_type: self.index_type,
			count: self.count,
			state: self.state.into_owned().ok_or(ContractViolation::NotCreated)?,
		})
	}

	#[inline]
	pub fn is_created(&self) -> bool {
		self.lifecycle() == Lifecycle::Created
	}

	#[inline]
	pub fn lifecycle(&self) -> Lifecycle {
		self.state.lifecycle()
	}

	#[inline]
	pub fn count(&self) -> usize {
		self.count
	}

	#[inline]
	pub fn index_type(&self) -> IndexType {
		self.index_type
	}

	/// Size of the table in bytes, always the source length once validated
	#[inline]
	pub fn size_in_bytes(&self) -> usize {
		self.state.bytes().len()
	}

	/// The private copy, once created
	pub fn data(&self) -> Option<&[u8]> {
		self.state.buffer().map(|_| self.state.bytes())
	}

	pub fn handle(&self) -> Option<BufferHandle> {
		self.state.buffer().map(DeviceBuffer::handle)
	}
}
