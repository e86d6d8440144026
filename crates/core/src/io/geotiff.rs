//! Native single-band GeoTIFF reading and writing
//!
//! Uses the `tiff` crate. Georeferencing is carried through the
//! ModelPixelScale (33550) and ModelTiepoint (33922) tags; floating-point
//! grids are stored as 32-bit float, byte grids as 8-bit.

use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement};
use std::fs::File;
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::{Gray32Float, Gray8};
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;

const MODEL_PIXEL_SCALE: Tag = Tag::ModelPixelScaleTag;
const MODEL_TIEPOINT: Tag = Tag::ModelTiepointTag;
const GEO_KEY_DIRECTORY: Tag = Tag::GeoKeyDirectoryTag;

/// Read a single-band GeoTIFF file into a `Raster`
pub fn read_geotiff<T, P>(path: P) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    let mut decoder =
        Decoder::new(file).map_err(|e| Error::GeoTiff(format!("decode error: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| Error::GeoTiff(format!("cannot read dimensions: {}", e)))?;
    let (rows, cols) = (height as usize, width as usize);

    let image = decoder
        .read_image()
        .map_err(|e| Error::GeoTiff(format!("cannot read image data: {}", e)))?;

    fn cast_all<S: Copy + num_traits::NumCast, T: RasterElement>(buf: &[S]) -> Vec<T> {
        buf.iter()
            .map(|&v| num_traits::cast(v).unwrap_or_else(T::default_nodata))
            .collect()
    }

    let data: Vec<T> = match image {
        DecodingResult::U8(buf) => cast_all(&buf),
        DecodingResult::U16(buf) => cast_all(&buf),
        DecodingResult::U32(buf) => cast_all(&buf),
        DecodingResult::I16(buf) => cast_all(&buf),
        DecodingResult::I32(buf) => cast_all(&buf),
        DecodingResult::F32(buf) => cast_all(&buf),
        DecodingResult::F64(buf) => cast_all(&buf),
        _ => {
            return Err(Error::GeoTiff("unsupported TIFF pixel format".to_string()));
        }
    };

    if data.len() != rows * cols {
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }

    let mut raster = Raster::from_vec(data, rows, cols)?;
    if let Some(transform) = read_geotransform(&mut decoder) {
        raster.set_transform(transform);
    }
    Ok(raster)
}

/// Read the geotransform from ModelPixelScale + ModelTiepoint tags, if present
fn read_geotransform<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> Option<GeoTransform> {
    let scale = decoder.get_tag_f64_vec(MODEL_PIXEL_SCALE).ok()?;
    let tiepoint = decoder.get_tag_f64_vec(MODEL_TIEPOINT).ok()?;

    if scale.len() < 2 || tiepoint.len() < 6 {
        return None;
    }

    // tiepoint: [I, J, K, X, Y, Z]; scale: [ScaleX, ScaleY, ScaleZ]
    let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
    let origin_y = tiepoint[4] + tiepoint[1] * scale[1];

    Some(GeoTransform::new(origin_x, origin_y, scale[0], -scale[1]))
}

/// Write a `Raster` to a GeoTIFF file, storing cell values as 32-bit float
pub fn write_geotiff<T, P>(raster: &Raster<T>, path: P) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::create(path.as_ref())?;
    let mut encoder =
        TiffEncoder::new(file).map_err(|e| Error::GeoTiff(format!("encoder error: {}", e)))?;

    let (rows, cols) = raster.shape();
    let data: Vec<f32> = raster
        .data()
        .iter()
        .map(|&v| num_traits::cast(v).unwrap_or(f32::NAN))
        .collect();

    let gt = *raster.transform();
    let mut image = encoder
        .new_image::<Gray32Float>(cols as u32, rows as u32)
        .map_err(|e| Error::GeoTiff(format!("cannot create TIFF image: {}", e)))?;

    let scale = [gt.pixel_width, gt.pixel_height.abs(), 0.0];
    image
        .encoder()
        .write_tag(MODEL_PIXEL_SCALE, &scale[..])
        .map_err(|e| Error::GeoTiff(format!("cannot write scale tag: {}", e)))?;
    let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
    image
        .encoder()
        .write_tag(MODEL_TIEPOINT, &tiepoint[..])
        .map_err(|e| Error::GeoTiff(format!("cannot write tiepoint tag: {}", e)))?;
    image
        .encoder()
        .write_tag(GEO_KEY_DIRECTORY, &GEOKEYS[..])
        .map_err(|e| Error::GeoTiff(format!("cannot write geokey tag: {}", e)))?;

    image
        .write_data(&data)
        .map_err(|e| Error::GeoTiff(format!("cannot write image data: {}", e)))?;

    Ok(())
}

/// Write a byte `Raster` (backlink / cost-path grids) to a GeoTIFF file
pub fn write_geotiff_u8<P: AsRef<Path>>(raster: &Raster<u8>, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut encoder =
        TiffEncoder::new(file).map_err(|e| Error::GeoTiff(format!("encoder error: {}", e)))?;

    let (rows, cols) = raster.shape();
    let data: Vec<u8> = raster.data().iter().copied().collect();

    let gt = *raster.transform();
    let mut image = encoder
        .new_image::<Gray8>(cols as u32, rows as u32)
        .map_err(|e| Error::GeoTiff(format!("cannot create TIFF image: {}", e)))?;

    let scale = [gt.pixel_width, gt.pixel_height.abs(), 0.0];
    image
        .encoder()
        .write_tag(MODEL_PIXEL_SCALE, &scale[..])
        .map_err(|e| Error::GeoTiff(format!("cannot write scale tag: {}", e)))?;
    let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
    image
        .encoder()
        .write_tag(MODEL_TIEPOINT, &tiepoint[..])
        .map_err(|e| Error::GeoTiff(format!("cannot write tiepoint tag: {}", e)))?;
    image
        .encoder()
        .write_tag(GEO_KEY_DIRECTORY, &GEOKEYS[..])
        .map_err(|e| Error::GeoTiff(format!("cannot write geokey tag: {}", e)))?;

    image
        .write_data(&data)
        .map_err(|e| Error::GeoTiff(format!("cannot write image data: {}", e)))?;

    Ok(())
}

/// Minimal GeoKeyDirectory: GTModelTypeGeoKey=Projected, GTRasterTypeGeoKey=PixelIsArea
const GEOKEYS: [u16; 12] = [
    1, 1, 0, 2, //
    1024, 0, 1, 1, //
    1025, 0, 1, 1, //
];
