// Copyright @yucwang 2026

//! Reflection, refraction and Fresnel terms at a boundary between two media.
//!
//! Directions follow one convention throughout: `i` points away from the
//! surface, on the same side as the normal `n`, so `cos_i = i.dot(n)` is
//! non-negative for a front-facing hit. `eta` is always the ratio
//! `eta_outside / eta_inside` seen from the side `i` lives on.
//!
//! Total internal reflection is not an error. It shows up as a zero
//! refraction vector, a zero transmitted cosine, or a reflectance of `1.0`.

use crate::math::constants::{Float, Vector3f};
use crate::math::scalar::{rcp, sqr};

#[inline]
pub fn reflect(i: &Vector3f, n: &Vector3f) -> Vector3f {
    reflect_with_cos(i, n, i.dot(n))
}

#[inline]
pub fn reflect_with_cos(i: &Vector3f, n: &Vector3f, cos_i: Float) -> Vector3f {
    2.0 * cos_i * n - i
}

#[inline]
fn sqr_cos_t(cos_i: Float, eta: Float) -> Float {
    1.0 - sqr(eta) * (1.0 - sqr(cos_i))
}

/// Refracted direction through the boundary, or the zero vector under total
/// internal reflection.
#[inline]
pub fn refract(i: &Vector3f, n: &Vector3f, cos_i: Float, eta: Float) -> Vector3f {
    let sqr_cos_t = sqr_cos_t(cos_i, eta);
    if sqr_cos_t < 0.0 {
        return Vector3f::zeros();
    }
    eta * (cos_i * n - i) - sqr_cos_t.sqrt() * n
}

/// Cosine of the transmitted direction, clamped to zero under total internal
/// reflection.
#[inline]
pub fn refract_cosine(cos_i: Float, eta: Float) -> Float {
    sqr_cos_t(cos_i, eta).max(0.0).sqrt()
}

#[inline]
pub fn fresnel_dielectric_cos(cos_i: Float, cos_t: Float, eta: Float) -> Float {
    let r_per = (eta * cos_i - cos_t) * rcp(eta * cos_i + cos_t);
    let r_par = (cos_i - eta * cos_t) * rcp(cos_i + eta * cos_t);
    0.5 * (sqr(r_par) + sqr(r_per))
}

#[inline]
pub fn fresnel_dielectric(cos_i: Float, eta: Float) -> Float {
    fresnel_dielectric_ex(cos_i, eta).0
}

/// Dielectric reflectance together with the transmitted cosine, so shading
/// that needs both reflection and refraction only solves Snell's law once.
#[inline]
pub fn fresnel_dielectric_ex(cos_i: Float, eta: Float) -> (Float, Float) {
    let sqr_cos_t = sqr_cos_t(cos_i, eta);
    if sqr_cos_t < 0.0 {
        return (1.0, 0.0);
    }
    let cos_t = sqr_cos_t.sqrt();
    (fresnel_dielectric_cos(cos_i, cos_t, eta), cos_t)
}

/// Per-channel reflectance of a conductor with complex index `eta + i k`,
/// relative to the incident medium. `cos_i` must be non-negative.
#[inline]
pub fn fresnel_conductor(cos_i: Float, eta: &Vector3f, k: &Vector3f) -> Vector3f {
    Vector3f::new(
        fresnel_conductor_channel(cos_i, eta.x, k.x),
        fresnel_conductor_channel(cos_i, eta.y, k.y),
        fresnel_conductor_channel(cos_i, eta.z, k.z),
    )
}

fn fresnel_conductor_channel(cos_i: Float, eta: Float, k: Float) -> Float {
    let cos2 = sqr(cos_i);
    let sin2 = 1.0 - cos2;
    let eta2 = sqr(eta);
    let k2 = sqr(k);

    // |n^2 - sin^2| where n is the complex index; a is its real square root.
    let t0 = eta2 - k2 - sin2;
    let a2_plus_b2 = (sqr(t0) + 4.0 * eta2 * k2).sqrt();
    let a = (0.5 * (a2_plus_b2 + t0)).max(0.0).sqrt();

    let t1 = a2_plus_b2 + cos2;
    let t2 = 2.0 * cos_i * a;
    let r_s = (t1 - t2) * rcp(t1 + t2);

    let t3 = cos2 * a2_plus_b2 + sqr(sin2);
    let t4 = t2 * sin2;
    let r_p = r_s * (t3 - t4) * rcp(t3 + t4);

    0.5 * (r_p + r_s)
}
