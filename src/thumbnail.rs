//! Turning a video thumbnail into square cover art.

use crate::error::{Error, Result};
use image::{DynamicImage, GenericImageView, ImageFormat};
use log::{debug, warn};
use std::io::Cursor;

/// An encoded cover picture, ready to be embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cover {
    /// The MIME type of `data`, e.g. `image/jpeg`.
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Downloads the thumbnail and crops it to a square cover.
///
/// Returns `None` when anything goes wrong; a missing cover never stops the pipeline.
pub async fn fetch_cover(url: &str) -> Option<Cover> {
    let result = async {
        let bytes = download_image(url).await?;
        square_cover(&bytes)
    }
    .await;

    match result {
        Ok(cover) => {
            debug!(
                "Prepared {} cover ({} bytes)",
                cover.mime_type,
                cover.data.len()
            );
            Some(cover)
        }
        Err(e) => {
            warn!("Failed to process the thumbnail: {}", e);
            None
        }
    }
}

async fn download_image(url: &str) -> Result<Vec<u8>> {
    let response = reqwest::get(url).await?;
    if !response.status().is_success() {
        return Err(Error::Http(response.status()));
    }

    Ok(response.bytes().await?.to_vec())
}

/// Decodes an image, center-crops it to a square and encodes it again.
///
/// WebP is not embeddable everywhere, so it is converted to RGB and re-encoded as JPEG.
/// Every other format keeps its own encoder and MIME type.
pub fn square_cover(bytes: &[u8]) -> Result<Cover> {
    let format = image::guess_format(bytes)?;
    let decoded = image::load_from_memory_with_format(bytes, format)?;

    let (image, format) = match format {
        ImageFormat::WebP => (DynamicImage::ImageRgb8(decoded.to_rgb8()), ImageFormat::Jpeg),
        other => (decoded, other),
    };

    let cropped = crop_to_square(&image);

    let mut data = Vec::new();
    cropped.write_to(&mut Cursor::new(&mut data), format)?;

    Ok(Cover {
        mime_type: format.to_mime_type().to_string(),
        data,
    })
}

/// Crops the largest centered square out of the image.
pub fn crop_to_square(image: &DynamicImage) -> DynamicImage {
    let (width, height) = image.dimensions();
    let side = width.min(height);
    if width == height {
        return image.clone();
    }

    let left = (width - side) / 2;
    let top = (height - side) / 2;
    image.crop_imm(left, top, side, side)
}
