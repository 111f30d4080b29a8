use assert2::assert;
use bon::bon;

use crate::geometry::{FloatType, Ray, Transform, WorldPoint};

/// Pinhole camera looking down -z of its own frame, with the image plane at z = -1.
#[derive(Clone, Debug)]
pub struct Camera {
    hsize: u32,
    vsize: u32,

    /// View transform, maps world space to camera space
    transform: Transform,

    half_width: FloatType,
    half_height: FloatType,
    /// Size of a pixel on the image plane
    pixel_size: FloatType,
}

#[bon]
impl Camera {
    #[builder]
    pub fn new(
        hsize: u32,
        vsize: u32,
        // Angle covered by the longer image side
        field_of_view: FloatType,
        #[builder(default)] transform: Transform,
    ) -> Self {
        assert!(hsize > 0);
        assert!(vsize > 0);
        assert!(field_of_view > 0.0 && field_of_view < std::f64::consts::PI);

        let half_view = (field_of_view / 2.0).tan();
        let aspect = hsize as FloatType / vsize as FloatType;
        let (half_width, half_height) = if aspect >= 1.0 {
            (half_view, half_view / aspect)
        } else {
            (half_view * aspect, half_view)
        };

        Camera {
            hsize,
            vsize,
            transform,
            half_width,
            half_height,
            pixel_size: half_width * 2.0 / hsize as FloatType,
        }
    }
}

impl Camera {
    pub fn hsize(&self) -> u32 {
        self.hsize
    }

    pub fn vsize(&self) -> u32 {
        self.vsize
    }

    pub fn pixel_size(&self) -> FloatType {
        self.pixel_size
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Primary ray through the center of pixel (x, y), with a normalized direction.
    /// Pixel (0, 0) is the top left corner of the image.
    pub fn ray_for_pixel(&self, x: u32, y: u32) -> Ray {
        let x_offset = (x as FloatType + 0.5) * self.pixel_size;
        let y_offset = (y as FloatType + 0.5) * self.pixel_size;

        // The camera looks toward -z, +x of the camera frame is on the left of the image
        let world_x = self.half_width - x_offset;
        let world_y = self.half_height - y_offset;

        let inverse = self.transform.inverse();
        let pixel = inverse.transform_point(&WorldPoint::new(world_x, world_y, -1.0));
        let origin = inverse.transform_point(&WorldPoint::origin());

        Ray::new(origin, (pixel - origin).normalize())
    }
}
