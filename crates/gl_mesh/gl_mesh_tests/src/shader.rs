// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

//! Just enough shader handling to look at vertex arrays

use gl::types::{GLchar, GLenum, GLint, GLuint};
use gl_mesh::slots;
use thiserror::Error;

const VERTEX_SOURCE: &str = r#"#version 330 core
layout(location = 0) in vec4 position;
layout(location = 1) in vec3 color;
out vec3 v_color;

void main() {
	gl_Position = position;
	gl_PointSize = 4.0;
	v_color = color;
}
"#;

const FRAGMENT_SOURCE: &str = r#"#version 330 core
in vec3 v_color;
out vec4 frag_color;

void main() {
	frag_color = vec4(v_color, 1.0);
}
"#;

#[derive(Debug, Error)]
pub enum ShaderError {
	#[error("could not create {0} (driver returned 0)")]
	CouldNotCreate(&'static str),
	#[error("could not compile shader - driver log:\n{0}\n")]
	Compile(String),
	#[error("could not link program - driver log:\n{0}\n")]
	Link(String),
}

/// Draws positions (slot 0) with per-vertex colors (slot 1).
///
/// While the color slot is disabled, vertices use [`Self::set_fallback_color`].
pub struct ColorShader {
	program: GLuint,
}

struct Stage(GLuint);

impl Stage {
	unsafe fn compile(ty: GLenum, source: &str) -> Result<Self, ShaderError> {
		let shader = gl::CreateShader(ty);
		if shader == 0 {
			return Err(ShaderError::CouldNotCreate("shader"))
		}
		let stage = Stage(shader);

		let src_ptr = source.as_ptr() as *const GLchar;
		let len = source.len() as GLint;
		gl::ShaderSource(shader, 1, &src_ptr, &len);
		gl::CompileShader(shader);

		let mut status = 0 as GLint;
		gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status);
		if status != gl::TRUE as GLint {
			let log = info_log(shader, gl::GetShaderiv, gl::GetShaderInfoLog);
			return Err(ShaderError::Compile(log))
		}

		Ok(stage)
	}
}

impl Drop for Stage {
	fn drop(&mut self) {
		// the driver keeps the object alive while attached to a program
		unsafe { gl::DeleteShader(self.0) };
	}
}

type GetIv = unsafe fn(GLuint, GLenum, *mut GLint);
type GetInfoLog = unsafe fn(GLuint, i32, *mut i32, *mut GLchar);

unsafe fn info_log(object: GLuint, get_iv: GetIv, get_log: GetInfoLog) -> String {
	let mut log_length = 0 as GLint;
	get_iv(object, gl::INFO_LOG_LENGTH, &mut log_length);

	let mut log = vec![0u8; log_length.max(1) as usize];
	get_log(object, log.len() as GLint, &mut log_length, log.as_mut_ptr() as *mut GLchar);
	log.truncate(log_length.max(0) as usize);

	String::from_utf8_lossy(&log).into_owned()
}

impl ColorShader {
	/// # SAFETY
	/// * must be called from GL thread
	pub unsafe fn new() -> Result<Self, ShaderError> {
		let vertex = Stage::compile(gl::VERTEX_SHADER, VERTEX_SOURCE)?;
		let fragment = Stage::compile(gl::FRAGMENT_SHADER, FRAGMENT_SOURCE)?;

		let program = gl::CreateProgram();
		if program == 0 {
			return Err(ShaderError::CouldNotCreate("program"))
		}

		gl::AttachShader(program, vertex.0);
		gl::AttachShader(program, fragment.0);
		gl::LinkProgram(program);
		gl::DetachShader(program, vertex.0);
		gl::DetachShader(program, fragment.0);

		let mut status = 0 as GLint;
		gl::GetProgramiv(program, gl::LINK_STATUS, &mut status);
		if status != gl::TRUE as GLint {
			let log = info_log(program, gl::GetProgramiv, gl::GetProgramInfoLog);
			gl::DeleteProgram(program);
			return Err(ShaderError::Link(log))
		}

		Ok(Self { program })
	}

	pub fn bind(&self) {
		unsafe { gl::UseProgram(self.program) };
	}

	/// Color used when the color slot is disabled
	pub fn set_fallback_color(&self, rgb: [f32; 3]) {
		unsafe { gl::VertexAttrib3f(slots::COLOR, rgb[0], rgb[1], rgb[2]) };
	}
}

impl Drop for ColorShader {
	fn drop(&mut self) {
		unsafe { gl::DeleteProgram(self.program) };
	}
}
