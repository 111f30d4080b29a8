use std::time::Instant;

use image::Rgb;

use crate::{camera::Camera, renderer::RenderSettings, scene::World, util::Stats};

pub struct Worker {
    worker_id: usize,
    pixels: Vec<Rgb<u8>>,
    /// Row render times in microseconds
    row_times: Stats,
}

impl Worker {
    pub fn new(worker_id: usize, width: u32) -> Self {
        Self {
            worker_id,
            pixels: Vec::with_capacity(width as usize),
            row_times: Stats::default(),
        }
    }

    pub fn worker_id(&self) -> usize {
        self.worker_id
    }

    pub fn row_times(&self) -> &Stats {
        &self.row_times
    }

    /// Traces all pixels of image row `y`.
    pub fn render_row(
        &mut self,
        world: &World,
        camera: &Camera,
        settings: &RenderSettings,
        y: u32,
    ) -> &[Rgb<u8>] {
        let start = Instant::now();

        self.pixels.clear();
        self.pixels.extend((0..camera.hsize()).map(|x| {
            let ray = camera.ray_for_pixel(x, y);
            world.color_at(&ray, settings.max_depth).to_rgb8()
        }));

        self.row_times
            .add_sample(start.elapsed().as_micros() as usize);

        &self.pixels
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::{Transform, WorldPoint, WorldVector};
    use assert2::assert;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn renders_default_world_center() {
        let world = World::default();
        let view = Transform::view(
            &WorldPoint::new(0.0, 0.0, -5.0),
            &WorldPoint::origin(),
            &WorldVector::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        let camera = Camera::builder()
            .hsize(11)
            .vsize(11)
            .field_of_view(FRAC_PI_2)
            .transform(view)
            .build();

        let mut worker = Worker::new(0, camera.hsize());
        let row = worker.render_row(&world, &camera, &RenderSettings::default(), 5);
        assert!(row.len() == 11);
        // 0.38066, 0.47583, 0.2855 scaled to 8 bits
        assert!(row[5] == Rgb([97, 121, 73]));
        assert!(worker.row_times().count == 1);
    }
}
