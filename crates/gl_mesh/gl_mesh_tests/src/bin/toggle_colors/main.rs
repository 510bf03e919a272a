// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

//! Non-indexed triangle fan outline whose color table is switched
//! on and off every second. While off, the shader's fallback white is used.

use std::f32::consts::TAU;

use gl_mesh::{slots, AttributeBuffer, PrimitiveKind, VertexArray};
use gl_mesh_tests::shader::ColorShader;
use glam::{Vec2, Vec3};

const SIDES: usize = 7;

fn main() {
	gl_mesh_tests::view_window("toggle_colors", true, |device| {
		let shader = unsafe { ColorShader::new() }.expect("could not build shader");
		shader.set_fallback_color([1.0, 1.0, 1.0]);

		let positions = (0..SIDES)
			.map(|i| {
				let angle = i as f32 / SIDES as f32 * TAU;
				Vec2::new(angle.cos(), angle.sin()) * 0.7
			})
			.collect::<Vec<_>>();
		let colors = (0..SIDES)
			.map(|i| {
				let t = i as f32 / SIDES as f32;
				Vec3::new(t, 1.0 - t, 0.5)
			})
			.collect::<Vec<_>>();

		let mut outline = VertexArray::new(
			AttributeBuffer::from_vec2(slots::POSITION, &positions).expect("invalid positions"),
		)
		.expect("invalid position attribute");
		outline
			.add_attribute(AttributeBuffer::from_vec3(slots::COLOR, &colors).expect("invalid colors"))
			.expect("could not add colors");
		outline.create(&device).expect("could not create outline");
		let mut outline = outline.into_owned().expect("outline was created above");

		let mut colored = true;

		// loop
		move |time: f64| {
			let want_colored = (time as u64) % 2 == 0;
			if want_colored != colored {
				colored = want_colored;
				log::info!("color table {}", if colored { "on" } else { "off" });
				if let Err(e) = outline.set_attribute_enabled(slots::COLOR, colored) {
					log::error!("could not toggle colors: {e}");
				}
			}

			shader.bind();
			for kind in [PrimitiveKind::LineLoop, PrimitiveKind::Points] {
				if let Err(e) = outline.draw(kind) {
					log::error!("draw failed: {e}");
				}
			}
		}
	});
}
