use std::{
    fs::File,
    io::{BufReader, Read, Seek},
    path::Path,
};

use tiff::{
    decoder::{Decoder, DecodingResult},
    tags::Tag,
};

use crate::{
    error::{MaskError, Result},
    types::{GeoTransform, Mask},
};

// GeoTIFF tag codes
const MODEL_PIXEL_SCALE_TAG: u16 = 33550;
const MODEL_TIEPOINT_TAG: u16 = 33922;
const MODEL_TRANSFORMATION_TAG: u16 = 34264;

/// First band of a georeferenced raster together with its affine transform
#[derive(Debug, Clone)]
pub struct GeoRaster {
    pub mask: Mask,
    pub transform: GeoTransform,
}

/// Load a mask from any image format the `image` crate decodes. Color input
/// is reduced to luma; any nonzero value is foreground.
pub fn load_mask<P: AsRef<Path>>(path: P) -> Result<Mask> {
    let image = image::open(path.as_ref())?;
    Ok(Mask::from_luma16(&image.to_luma16()))
}

/// Load band 1 of a GeoTIFF and its pixel-to-world transform
pub fn load_geo_mask<P: AsRef<Path>>(path: P) -> Result<GeoRaster> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut decoder = Decoder::new(BufReader::new(file))?;

    let (width, height) = decoder.dimensions()?;
    let transform = read_geo_transform(&mut decoder)?
        .ok_or_else(|| MaskError::MissingGeoTransform(path.to_path_buf()))?;

    let pixels = width as usize * height as usize;
    let foreground = match decoder.read_image()? {
        DecodingResult::U8(buffer) => first_band(&buffer, pixels, |v| v != 0)?,
        DecodingResult::U16(buffer) => first_band(&buffer, pixels, |v| v != 0)?,
        DecodingResult::U32(buffer) => first_band(&buffer, pixels, |v| v != 0)?,
        DecodingResult::U64(buffer) => first_band(&buffer, pixels, |v| v != 0)?,
        DecodingResult::I8(buffer) => first_band(&buffer, pixels, |v| v != 0)?,
        DecodingResult::I16(buffer) => first_band(&buffer, pixels, |v| v != 0)?,
        DecodingResult::I32(buffer) => first_band(&buffer, pixels, |v| v != 0)?,
        DecodingResult::I64(buffer) => first_band(&buffer, pixels, |v| v != 0)?,
        DecodingResult::F32(buffer) => first_band(&buffer, pixels, |v| v != 0.0 && !v.is_nan())?,
        DecodingResult::F64(buffer) => first_band(&buffer, pixels, |v| v != 0.0 && !v.is_nan())?,
        #[allow(unreachable_patterns)]
        _ => return Err(MaskError::UnsupportedRaster("unsupported sample format".to_string())),
    };

    tracing::debug!(
        "loaded {}x{} geo raster from {} with transform {:?}",
        width, height, path.display(), transform
    );

    let mask = Mask::from_fn(width, height, |x, y| {
        foreground[y as usize * width as usize + x as usize]
    });
    Ok(GeoRaster { mask, transform })
}

/// Picks sample 0 of every pixel from an interleaved (chunky) buffer
fn first_band<T: Copy>(buffer: &[T], pixels: usize, is_foreground: impl Fn(T) -> bool) -> Result<Vec<bool>> {
    if pixels == 0 || buffer.len() < pixels || buffer.len() % pixels != 0 {
        return Err(MaskError::UnsupportedRaster(format!(
            "{} samples for {} pixels",
            buffer.len(),
            pixels
        )));
    }
    let samples_per_pixel = buffer.len() / pixels;
    Ok(buffer
        .iter()
        .step_by(samples_per_pixel)
        .map(|&v| is_foreground(v))
        .collect())
}

fn read_geo_transform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<Option<GeoTransform>> {
    if let Some(matrix) = read_f64_tag(decoder, MODEL_TRANSFORMATION_TAG)? {
        return Ok(GeoTransform::from_model_transformation(&matrix));
    }

    let scale = read_f64_tag(decoder, MODEL_PIXEL_SCALE_TAG)?;
    let tiepoint = read_f64_tag(decoder, MODEL_TIEPOINT_TAG)?;
    Ok(match (scale, tiepoint) {
        (Some(scale), Some(tiepoint)) => GeoTransform::from_scale_and_tiepoint(&scale, &tiepoint),
        _ => None,
    })
}

fn read_f64_tag<R: Read + Seek>(decoder: &mut Decoder<R>, code: u16) -> Result<Option<Vec<f64>>> {
    match decoder.find_tag(Tag::from_u16_exhaustive(code))? {
        Some(value) => Ok(Some(value.into_f64_vec()?)),
        None => Ok(None),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};
    use tiff::encoder::{colortype, TiffEncoder};

    /// Writes an 8-bit GeoTIFF with optional scale/tiepoint tags
    pub(crate) fn write_geotiff(
        path: &Path,
        width: u32,
        height: u32,
        pixels: &[u8],
        georeference: Option<([f64; 3], [f64; 6])>,
    ) {
        let file = File::create(path).unwrap();
        let mut encoder = TiffEncoder::new(file).unwrap();
        let mut image = encoder.new_image::<colortype::Gray8>(width, height).unwrap();
        if let Some((scale, tiepoint)) = georeference {
            image
                .encoder()
                .write_tag(Tag::from_u16_exhaustive(MODEL_PIXEL_SCALE_TAG), &scale[..])
                .unwrap();
            image
                .encoder()
                .write_tag(Tag::from_u16_exhaustive(MODEL_TIEPOINT_TAG), &tiepoint[..])
                .unwrap();
        }
        image.write_data(pixels).unwrap();
    }

    #[test]
    fn test_load_png_mask() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.png");
        let mut image = GrayImage::new(6, 4);
        image.put_pixel(2, 1, Luma([1u8]));
        image.put_pixel(3, 1, Luma([255u8]));
        image.save(&path).unwrap();

        let mask = load_mask(&path).unwrap();
        assert_eq!((mask.width(), mask.height()), (6, 4));
        assert!(mask.is_foreground(2, 1));
        assert!(mask.is_foreground(3, 1));
        assert_eq!(mask.foreground_count(), 2);
    }

    #[test]
    fn test_load_color_mask_as_luma() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.png");
        let mut image = RgbImage::new(3, 3);
        image.put_pixel(1, 1, Rgb([0, 200, 0]));
        image.save(&path).unwrap();

        let mask = load_mask(&path).unwrap();
        assert_eq!(mask.foreground_count(), 1);
        assert!(mask.is_foreground(1, 1));
    }

    #[test]
    fn test_missing_mask_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_mask(dir.path().join("absent.png")).is_err());
        assert!(matches!(
            load_geo_mask(dir.path().join("absent.tif")),
            Err(MaskError::Io(_))
        ));
    }

    #[test]
    fn test_load_geotiff_with_transform() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.tif");
        let mut pixels = vec![0u8; 4 * 3];
        pixels[4 + 2] = 7;
        write_geotiff(
            &path,
            4,
            3,
            &pixels,
            Some(([10.0, 10.0, 0.0], [0.0, 0.0, 0.0, 500_000.0, 4_000_000.0, 0.0])),
        );

        let raster = load_geo_mask(&path).unwrap();
        assert_eq!((raster.mask.width(), raster.mask.height()), (4, 3));
        assert!(raster.mask.is_foreground(2, 1));
        assert_eq!(raster.mask.foreground_count(), 1);
        assert_eq!(
            raster.transform,
            GeoTransform::new(10.0, 0.0, 500_000.0, 0.0, -10.0, 4_000_000.0)
        );
    }

    #[test]
    fn test_geotiff_without_tags_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.tif");
        write_geotiff(&path, 2, 2, &[0, 1, 0, 0], None);

        assert!(matches!(load_geo_mask(&path), Err(MaskError::MissingGeoTransform(_))));
    }

    #[test]
    fn test_first_band_of_interleaved_samples() {
        let buffer = [0u8, 9, 5, 0, 0, 0];
        assert_eq!(first_band(&buffer, 3, |v| v != 0).unwrap(), vec![false, true, false]);
        assert!(first_band(&buffer, 4, |v| v != 0).is_err());
    }
}
