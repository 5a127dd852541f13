use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageDecoder, ImageReader, RgbaImage};

use crate::config::ModelConfig;
use crate::error::PipelineError;
use crate::tensor::Tensor;
use crate::upload::UploadedImage;

/// Decoded image stretched onto a fixed RGBA canvas.
///
/// Every call builds its own surface, so preprocessing never shares pixel state.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    pixels: RgbaImage,
}

impl PixelSurface {
    /// Decodes `bytes` upright, honouring the EXIF orientation tag the way a
    /// browser does when it renders the preview.
    pub fn decode(bytes: &[u8], width: u32, height: u32) -> Result<Self, PipelineError> {
        let mut decoder = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode(e.to_string()))?
            .into_decoder()?;
        let orientation = decoder.orientation()?;
        let mut image = DynamicImage::from_decoder(decoder)?;
        image.apply_orientation(orientation);
        Ok(Self::from_image(&image, width, height))
    }

    /// Wraps RGBA pixels that were already rasterized at the target size.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, PipelineError> {
        let len = rgba.len();
        RgbaImage::from_raw(width, height, rgba)
            .map(|pixels| Self { pixels })
            .ok_or_else(|| {
                PipelineError::Decode(format!(
                    "{} bytes do not fill a {}x{} RGBA surface",
                    len, width, height
                ))
            })
    }

    /// Resamples to exactly `width` x `height`; the aspect ratio is not kept.
    pub fn from_image(image: &DynamicImage, width: u32, height: u32) -> Self {
        let rgba = image.to_rgba8();
        let pixels = imageops::resize(&rgba, width, height, FilterType::Triangle);
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn rgba(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// CHW layout `[1, 3, H, W]`: all red values, then green, then blue, each scaled to [0, 1].
    /// Alpha is dropped.
    pub fn to_input_tensor(&self) -> Tensor {
        let (width, height) = self.pixels.dimensions();
        let num_pixels = (width * height) as usize;
        let mut data = vec![0.0f32; 3 * num_pixels];

        for (i, pixel) in self.pixels.pixels().enumerate() {
            data[i] = pixel[0] as f32 / 255.0;
            data[num_pixels + i] = pixel[1] as f32 / 255.0;
            data[2 * num_pixels + i] = pixel[2] as f32 / 255.0;
        }

        Tensor {
            data,
            dims: vec![1, 3, height as usize, width as usize],
        }
    }
}

/// Decodes an upload in-process and stretches it to the model input size.
pub fn rasterize(image: &UploadedImage, config: &ModelConfig) -> Result<PixelSurface, PipelineError> {
    PixelSurface::decode(image.bytes(), config.input_width, config.input_height)
}
