// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

use std::rc::Rc;

use gl_mesh::device::GlDevice;
use glfw::{Context, OpenGlProfileHint, WindowHint};

pub mod debug;
pub mod shader;

/// Open a window with a GL 3.3 core context and run `test` in it.
///
/// `test` sets up its vertex arrays on the GL thread and returns the
/// per-frame closure, which receives the time since startup in seconds.
pub fn view_window<I, L>(title: &str, vsync: bool, test: I)
where
	I: FnOnce(Rc<GlDevice>) -> L,
	L: FnMut(f64),
{
	env_logger::init();

	let mut glfw = glfw::init(glfw::FAIL_ON_ERRORS).expect("could not initialize glfw");
	glfw.window_hint(WindowHint::ContextVersion(3, 3));
	glfw.window_hint(WindowHint::OpenGlProfile(OpenGlProfileHint::Core));
	glfw.window_hint(WindowHint::OpenGlDebugContext(true));

	let (mut window, events) = glfw
		.create_window(800, 800, title, glfw::WindowMode::Windowed)
		.expect("could not create window");

	window.make_current();

	if !vsync {
		glfw.set_swap_interval(glfw::SwapInterval::None);
	}

	window.set_size_polling(true);

	gl::load_with(|p| window.get_proc_address(p));
	debug::setup_gl_debug();

	let device = Rc::new(unsafe { GlDevice::new() });
	let mut test_loop = test(device);

	while !window.should_close() {
		unsafe {
			gl::ClearColor(0.1, 0.1, 0.12, 1.0);
			gl::Clear(gl::COLOR_BUFFER_BIT);
			gl::Enable(gl::PROGRAM_POINT_SIZE);
		}

		test_loop(glfw.get_time());

		window.swap_buffers();
		glfw.poll_events();
		for (_, event) in glfw::flush_messages(&events) {
			if let glfw::WindowEvent::Size(width, height) = event {
				unsafe { gl::Viewport(0, 0, width, height) };
			}
		}
	}
}
