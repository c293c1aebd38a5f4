//! The 88 IAU constellations, in catalog order.
//!
//! The position of an entry in [`CONSTELLATIONS`] is its constellation index: it is
//! written into every CST0/STAR/ASTR/ART0 record and forms the `cc` part of each
//! [`StarId`](crate::StarId). The table is part of the wire format and must never be
//! reordered.

use hashbrown::HashMap;
use std::sync::OnceLock;

/// Number of constellations in the catalog table
pub const CONSTELLATION_COUNT: usize = 88;

/// `(abbreviation, full name)` for every constellation, indexed by constellation index
pub const CONSTELLATIONS: [(&str, &str); CONSTELLATION_COUNT] = [
    ("And", "Andromeda"),
    ("Ant", "Antlia"),
    ("Aps", "Apus"),
    ("Aqr", "Aquarius"),
    ("Aql", "Aquila"),
    ("Ara", "Ara"),
    ("Ari", "Aries"),
    ("Aur", "Auriga"),
    ("Boo", "Boötes"),
    ("Cae", "Caelum"),
    ("Cam", "Camelopardalis"),
    ("Cnc", "Cancer"),
    ("CVn", "Canes Venatici"),
    ("CMa", "Canis Major"),
    ("CMi", "Canis Minor"),
    ("Cap", "Capricornus"),
    ("Car", "Carina"),
    ("Cas", "Cassiopeia"),
    ("Cen", "Centaurus"),
    ("Cep", "Cepheus"),
    ("Cet", "Cetus"),
    ("Cha", "Chamaeleon"),
    ("Cir", "Circinus"),
    ("Col", "Columba"),
    ("Com", "Coma Berenices"),
    ("CrA", "Corona Australis"),
    ("CrB", "Corona Borealis"),
    ("Crv", "Corvus"),
    ("Crt", "Crater"),
    ("Cru", "Crux"),
    ("Cyg", "Cygnus"),
    ("Del", "Delphinus"),
    ("Dor", "Dorado"),
    ("Dra", "Draco"),
    ("Equ", "Equuleus"),
    ("Eri", "Eridanus"),
    ("For", "Fornax"),
    ("Gem", "Gemini"),
    ("Gru", "Grus"),
    ("Her", "Hercules"),
    ("Hor", "Horologium"),
    ("Hya", "Hydra"),
    ("Hyi", "Hydrus"),
    ("Ind", "Indus"),
    ("Lac", "Lacerta"),
    ("Leo", "Leo"),
    ("LMi", "Leo Minor"),
    ("Lep", "Lepus"),
    ("Lib", "Libra"),
    ("Lup", "Lupus"),
    ("Lyn", "Lynx"),
    ("Lyr", "Lyra"),
    ("Men", "Mensa"),
    ("Mic", "Microscopium"),
    ("Mon", "Monoceros"),
    ("Mus", "Musca"),
    ("Nor", "Norma"),
    ("Oct", "Octans"),
    ("Oph", "Ophiuchus"),
    ("Ori", "Orion"),
    ("Pav", "Pavo"),
    ("Peg", "Pegasus"),
    ("Per", "Perseus"),
    ("Phe", "Phoenix"),
    ("Pic", "Pictor"),
    ("Psc", "Pisces"),
    ("PsA", "Piscis Austrinus"),
    ("Pup", "Puppis"),
    ("Pyx", "Pyxis"),
    ("Ret", "Reticulum"),
    ("Sge", "Sagitta"),
    ("Sgr", "Sagittarius"),
    ("Sco", "Scorpius"),
    ("Scl", "Sculptor"),
    ("Sct", "Scutum"),
    ("Ser", "Serpens"),
    ("Sex", "Sextans"),
    ("Tau", "Taurus"),
    ("Tel", "Telescopium"),
    ("Tri", "Triangulum"),
    ("TrA", "Triangulum Australe"),
    ("Tuc", "Tucana"),
    ("UMa", "Ursa Major"),
    ("UMi", "Ursa Minor"),
    ("Vel", "Vela"),
    ("Vir", "Virgo"),
    ("Vol", "Volans"),
    ("Vul", "Vulpecula"),
];

/// One entry of the constellation table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constellation {
    pub index: u16,
    pub abbr: &'static str,
    pub name: &'static str,
}

impl Constellation {
    /// Look up a constellation by its three-letter abbreviation (case-sensitive, e.g. "UMa")
    pub fn from_abbr(abbr: &str) -> Option<Self> {
        constellation_index(abbr).and_then(Self::from_index)
    }

    /// Look up a constellation by its catalog index
    pub fn from_index(index: u16) -> Option<Self> {
        CONSTELLATIONS
            .get(index as usize)
            .map(|&(abbr, name)| Self { index, abbr, name })
    }

    /// Iterate the whole table in catalog order
    pub fn all() -> impl Iterator<Item = Constellation> {
        CONSTELLATIONS
            .iter()
            .enumerate()
            .map(|(i, &(abbr, name))| Constellation {
                index: i as u16,
                abbr,
                name,
            })
    }
}

/// Resolve an abbreviation to its catalog index
pub fn constellation_index(abbr: &str) -> Option<u16> {
    static INDEX: OnceLock<HashMap<&'static str, u16>> = OnceLock::new();
    INDEX
        .get_or_init(|| {
            CONSTELLATIONS
                .iter()
                .enumerate()
                .map(|(i, &(abbr, _))| (abbr, i as u16))
                .collect()
        })
        .get(abbr)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashSet;

    #[test]
    fn test_table_has_88_unique_abbreviations() {
        let abbrs: HashSet<_> = CONSTELLATIONS.iter().map(|(a, _)| *a).collect();
        assert_eq!(abbrs.len(), CONSTELLATION_COUNT);
        assert!(abbrs.iter().all(|a| a.len() == 3));
    }

    #[test]
    fn test_known_indices() {
        assert_eq!(constellation_index("And"), Some(0));
        assert_eq!(constellation_index("Ori"), Some(59));
        assert_eq!(constellation_index("UMa"), Some(82));
        assert_eq!(constellation_index("Vul"), Some(87));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(constellation_index("ori"), None);
        assert_eq!(constellation_index("ORI"), None);
        assert_eq!(constellation_index("Xyz"), None);
    }

    #[test]
    fn test_from_abbr_and_index_agree() {
        let orion = Constellation::from_abbr("Ori").unwrap();
        assert_eq!(orion.name, "Orion");
        assert_eq!(Constellation::from_index(orion.index), Some(orion));
        assert!(Constellation::from_index(88).is_none());
    }

    #[test]
    fn test_all_iterates_in_catalog_order() {
        for (i, c) in Constellation::all().enumerate() {
            assert_eq!(c.index as usize, i);
        }
        assert_eq!(Constellation::all().count(), CONSTELLATION_COUNT);
    }
}
