// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

use std::{ffi::c_void, marker::PhantomData, num::NonZeroU32, ptr};

use gl::types::{GLenum, GLint, GLsizei, GLsizeiptr, GLuint};

use super::{BufferHandle, BufferTarget, Device, VertexArrayHandle};
use crate::{
	error::DeviceError,
	types::{IndexType, PrimitiveKind, ScalarType},
};

#[cfg(test)]
mod test;

/// Errors a driver may queue up before reporting `NO_ERROR` again
const MAX_PENDING_ERRORS: usize = 16;

#[derive(Debug, Clone, Copy)]
pub struct GlLimits {
	pub max_vertex_attribs: u32,
}

/// [`Device`] backed by the current OpenGL context.
///
/// !Send, GL objects must be created and deleted on the context's thread.
#[derive(Debug)]
pub struct GlDevice {
	limits: GlLimits,
	_not_send: PhantomData<*const ()>,
}

pub fn query_gl_limits() -> GlLimits {
	let mut max_vertex_attribs = 0 as GLint;
	unsafe { gl::GetIntegerv(gl::MAX_VERTEX_ATTRIBS, &mut max_vertex_attribs) };

	GlLimits {
		// GL 3.3 guarantees at least 16
		max_vertex_attribs: max_vertex_attribs.max(0) as u32,
	}
}

impl GlDevice {
	/// # SAFETY
	/// * must be called from GL thread
	/// * GL function pointers must be loaded (`gl::load_with`)
	pub unsafe fn new() -> Self {
		let limits = query_gl_limits();
		log::debug!("OpenGL device limits: {limits:?}");

		Self {
			limits,
			_not_send: PhantomData,
		}
	}

	pub fn limits(&self) -> GlLimits {
		self.limits
	}
}

impl Device for GlDevice {
	fn create_buffer(
		&self,
		target: BufferTarget,
		data: &[u8],
	) -> Result<BufferHandle, DeviceError> {
		let mut buffer = 0 as GLuint;

		unsafe {
			gl::GenBuffers(1, &mut buffer);
			let Some(name) = NonZeroU32::new(buffer) else {
				return Err(DeviceError::CouldNotCreate("buffer"))
			};

			// errors left by earlier calls must not be reported for this upload
			for _ in 0..MAX_PENDING_ERRORS {
				match gl::GetError() {
					gl::NO_ERROR => break,
					stale => log::warn!("discarding GL error {stale:#06x} raised before buffer upload"),
				}
			}

			gl::BindBuffer(target.gl_target(), buffer);
			gl::BufferData(
				target.gl_target(),
				data.len() as GLsizeiptr,
				data.as_ptr() as *const c_void,
				gl::STATIC_DRAW,
			);

			if let Some(error) = upload_error(gl::GetError()) {
				gl::DeleteBuffers(1, &buffer);
				return Err(error)
			}

			Ok(BufferHandle(name))
		}
	}

	fn delete_buffer(&self, buffer: BufferHandle) {
		unsafe { gl::DeleteBuffers(1, &buffer.0.get()) };
	}

	fn bind_buffer(&self, target: BufferTarget, buffer: BufferHandle) {
		unsafe { gl::BindBuffer(target.gl_target(), buffer.0.get()) };
	}

	fn create_vertex_array(&self) -> Result<VertexArrayHandle, DeviceError> {
		let mut vao = 0 as GLuint;
		unsafe { gl::GenVertexArrays(1, &mut vao) };

		NonZeroU32::new(vao)
			.map(VertexArrayHandle)
			.ok_or(DeviceError::CouldNotCreate("vertex array"))
	}

	fn delete_vertex_array(&self, vertex_array: VertexArrayHandle) {
		unsafe { gl::DeleteVertexArrays(1, &vertex_array.0.get()) };
	}

	fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>) {
		unsafe { gl::BindVertexArray(vertex_array.map(|v| v.0.get()).unwrap_or(0)) };
	}

	fn attribute_pointer(&self, slot: u32, tuple_width: u32, scalar_type: ScalarType) {
		// one table per buffer, tightly packed
		unsafe {
			gl::VertexAttribPointer(
				slot,
				tuple_width as GLint,
				scalar_type.gl_type(),
				gl::FALSE,
				0,
				ptr::null(),
			)
		};
	}

	fn set_attribute_enabled(&self, slot: u32, enabled: bool) {
		unsafe {
			match enabled {
				true => gl::EnableVertexAttribArray(slot),
				false => gl::DisableVertexAttribArray(slot),
			}
		}
	}

	fn draw_arrays(&self, kind: PrimitiveKind, count: usize) {
		let Some(count) = draw_count(count) else { return };
		unsafe { gl::DrawArrays(kind.gl_mode(), 0, count) };
	}

	fn draw_elements(&self, kind: PrimitiveKind, count: usize, index_type: IndexType) {
		let Some(count) = draw_count(count) else { return };
		unsafe { gl::DrawElements(kind.gl_mode(), count, index_type.gl_type(), ptr::null()) };
	}

	fn max_attribute_slots(&self) -> u32 {
		self.limits.max_vertex_attribs
	}
}

/// Map the error reported right after `BufferData`
fn upload_error(error: GLenum) -> Option<DeviceError> {
	match error {
		gl::NO_ERROR => None,
		gl::OUT_OF_MEMORY => Some(DeviceError::OutOfMemory),
		other => Some(DeviceError::Driver(other)),
	}
}

/// Validated descriptors never exceed `GLsizei`, anything else is skipped
fn draw_count(count: usize) -> Option<GLsizei> {
	match GLsizei::try_from(count) {
		Ok(count) => Some(count),
		Err(_) => {
			log::error!("skipping draw of {count} elements, more than GL can address");
			None
		},
	}
}
