// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::materials::optics::{fresnel_conductor, fresnel_dielectric};
use crate::math::constants::{Float, Vector3f};

/// Optical description of the interface a ray is crossing. Built per
/// interaction by shading code and dropped afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoundaryMaterial {
    Dielectric {
        eta_incident: Float,
        eta_transmitted: Float,
    },
    Conductor {
        eta: Vector3f,
        k: Vector3f,
    },
}

impl BoundaryMaterial {
    pub fn dielectric(eta_incident: Float, eta_transmitted: Float) -> Self {
        BoundaryMaterial::Dielectric { eta_incident, eta_transmitted }
    }

    pub fn conductor(eta: Vector3f, k: Vector3f) -> Self {
        BoundaryMaterial::Conductor { eta, k }
    }

    pub fn is_conductor(&self) -> bool {
        matches!(self, BoundaryMaterial::Conductor { .. })
    }

    /// `eta_incident / eta_transmitted`, the ratio the optics kernels expect.
    /// Conductors have no real relative index.
    pub fn relative_eta(&self) -> Option<Float> {
        match self {
            BoundaryMaterial::Dielectric { eta_incident, eta_transmitted } => {
                Some(eta_incident / eta_transmitted)
            }
            BoundaryMaterial::Conductor { .. } => None,
        }
    }

    /// The same interface seen from the other side. Conductors are opaque,
    /// so only dielectrics change.
    pub fn flipped(&self) -> Self {
        match *self {
            BoundaryMaterial::Dielectric { eta_incident, eta_transmitted } => {
                BoundaryMaterial::Dielectric {
                    eta_incident: eta_transmitted,
                    eta_transmitted: eta_incident,
                }
            }
            conductor => conductor,
        }
    }

    /// Per-channel Fresnel reflectance; dielectrics broadcast one value.
    pub fn reflectance(&self, cos_i: Float) -> Vector3f {
        match self {
            BoundaryMaterial::Dielectric { eta_incident, eta_transmitted } => {
                Vector3f::repeat(fresnel_dielectric(cos_i, eta_incident / eta_transmitted))
            }
            BoundaryMaterial::Conductor { eta, k } => fresnel_conductor(cos_i, eta, k),
        }
    }
}

/// A boundary material declared in a config, addressable by id.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundaryNode {
    id: String,
    material: BoundaryMaterial,
}

impl BoundaryNode {
    pub fn new(id: String, material: BoundaryMaterial) -> Self {
        Self { id, material }
    }

    pub fn material(&self) -> &BoundaryMaterial {
        &self.material
    }
}

impl ComputationNode for BoundaryNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn to_string(&self) -> String {
        match self.material {
            BoundaryMaterial::Dielectric { eta_incident, eta_transmitted } => format!(
                "Dielectric[id={}, ext_ior={}, int_ior={}]",
                self.id, eta_incident, eta_transmitted
            ),
            BoundaryMaterial::Conductor { eta, k } => format!(
                "Conductor[id={}, eta=({}, {}, {}), k=({}, {}, {})]",
                self.id, eta.x, eta.y, eta.z, k.x, k.y, k.z
            ),
        }
    }
}

const NAMED_IORS: [(&str, Float); 23] = [
    ("vacuum", 1.0),
    ("helium", 1.00004),
    ("hydrogen", 1.00013),
    ("air", 1.000277),
    ("carbon dioxide", 1.00045),
    ("water", 1.3330),
    ("acetone", 1.36),
    ("ethanol", 1.361),
    ("carbon tetrachloride", 1.461),
    ("glycerol", 1.4729),
    ("benzene", 1.501),
    ("silicone oil", 1.52045),
    ("bromine", 1.661),
    ("water ice", 1.31),
    ("fused quartz", 1.458),
    ("pyrex", 1.470),
    ("acrylic glass", 1.49),
    ("polypropylene", 1.49),
    ("bk7", 1.5046),
    ("sodium chloride", 1.544),
    ("amber", 1.55),
    ("pet", 1.5750),
    ("diamond", 2.419),
];

/// Index of refraction for a named medium, case insensitive.
pub fn lookup_ior(name: &str) -> Option<Float> {
    let name = name.trim().to_ascii_lowercase();
    NAMED_IORS.iter().find(|(n, _)| *n == name).map(|(_, ior)| *ior)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ior() {
        assert_eq!(lookup_ior("bk7"), Some(1.5046));
        assert_eq!(lookup_ior(" Water "), Some(1.3330));
        assert_eq!(lookup_ior("unobtainium"), None);
    }

    #[test]
    fn test_boundary_node_describes_material() {
        let glass = BoundaryNode::new(String::from("glass"), BoundaryMaterial::dielectric(1.0, 1.5));
        assert_eq!(glass.id(), "glass");
        assert_eq!(glass.to_string(), "Dielectric[id=glass, ext_ior=1, int_ior=1.5]");
        let gold = BoundaryNode::new(
            String::from("gold"),
            BoundaryMaterial::conductor(Vector3f::repeat(0.2), Vector3f::repeat(3.0)),
        );
        assert!(gold.material().is_conductor());
        assert!(gold.to_string().starts_with("Conductor[id=gold"));
    }

    #[test]
    fn test_dielectric_flip_and_eta() {
        let glass = BoundaryMaterial::dielectric(1.0, 1.5);
        assert!((glass.relative_eta().unwrap() - 1.0 / 1.5).abs() < 1e-6);
        let inside = glass.flipped();
        assert_eq!(inside.relative_eta(), Some(1.5));
        assert_eq!(inside.flipped(), glass);
        assert!(!glass.is_conductor());
    }

    #[test]
    fn test_reflectance_matches_kernels() {
        let glass = BoundaryMaterial::dielectric(1.0, 1.5);
        let r = glass.reflectance(1.0);
        assert!((r.x - 0.04).abs() < 1e-5);
        assert_eq!(r.x, r.y);
        assert_eq!(r.y, r.z);

        // Leaving glass at a grazing angle reflects everything.
        assert_eq!(glass.flipped().reflectance(0.1), Vector3f::repeat(1.0));

        let eta = Vector3f::new(0.2, 0.9, 1.1);
        let k = Vector3f::new(3.9, 2.4, 2.2);
        let metal = BoundaryMaterial::conductor(eta, k);
        assert!(metal.is_conductor());
        assert_eq!(metal.relative_eta(), None);
        assert_eq!(metal.flipped(), metal);
        assert_eq!(metal.reflectance(0.7), fresnel_conductor(0.7, &eta, &k));
    }
}
