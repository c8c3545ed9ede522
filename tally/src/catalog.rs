//! Landing-page catalog: sections of calculators and converters

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogItem {
    pub title: &'static str,
    pub description: &'static str,
    pub href: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Section {
    pub title: &'static str,
    pub items: &'static [CatalogItem],
}

const fn item(title: &'static str, description: &'static str, href: &'static str) -> CatalogItem {
    CatalogItem { title, description, href }
}

const BASIC: [CatalogItem; 7] = [
    item("BMI Calculator", "Calculate your Body Mass Index", "/bmi"),
    item("EMI Calculator", "Calculate your loan EMI", "/emi"),
    item("Currency Converter", "Convert between different currencies", "/currency"),
    item("Timestamp Converter", "Convert between different time formats", "/timestamp"),
    item("Units Converter", "Convert between different units", "/units"),
    item("EPF Calculator", "Calculate your EPF maturity amount and pension benefits", "/epf"),
    item("Information Hub", "Learn about conversions, formulas and calculations", "/info"),
];

const ENGINEERING: [CatalogItem; 22] = [
    item("Length", "Convert between different units of length", "/units?type=length"),
    item("Volume", "Convert between different units of volume", "/units?type=volume"),
    item("Area", "Convert between different units of area", "/units?type=area"),
    item("Speed", "Convert between different units of speed", "/units?type=speed"),
    item("Energy", "Convert between different units of energy", "/units?type=energy"),
    item("Force", "Convert between different units of force", "/units?type=force"),
    item("Fuel Consumption", "Convert between different units of fuel consumption", "/units?type=fuel"),
    item("Data Storage", "Convert between different units of data storage", "/units?type=data"),
    item("Weight & Mass", "Convert between different units of weight and mass", "/units?type=weight"),
    item("Pressure", "Convert between different units of pressure", "/units?type=pressure"),
    item("Temperature", "Convert between different units of temperature", "/units?type=temperature"),
    item("Power", "Convert between different units of power", "/units?type=power"),
    item("Time", "Convert between different units of time", "/units?type=time"),
    item("Angle", "Convert between different units of angle", "/units?type=angle"),
    item("Volume (Dry)", "Convert between different units of dry volume", "/units?type=volume-dry"),
    item("Density", "Convert between different units of density", "/units?type=density"),
    item("Moment of Inertia", "Convert between different units of moment of inertia", "/units?type=inertia"),
    item("Torque", "Convert between different units of torque", "/units?type=torque"),
    item("Angular Velocity", "Convert between different units of angular velocity", "/units?type=angular-velocity"),
    item("Angular Acceleration", "Convert between different units of angular acceleration", "/units?type=angular-acceleration"),
    item("Specific Volume", "Convert between different units of specific volume", "/units?type=specific-volume"),
    item("Moment Force", "Convert between different units of moment force", "/units?type=moment-force"),
];

const HEAT: [CatalogItem; 4] = [
    item("Temperature", "Convert between different temperature scales", "/units?type=temperature"),
    item("Heat Transfer", "Convert heat transfer coefficients", "/units?type=heat-transfer"),
    item("Thermal Conductivity", "Convert thermal conductivity units", "/units?type=thermal-conductivity"),
    item("Heat Capacity", "Convert heat capacity units", "/units?type=heat-capacity"),
];

const FLUID: [CatalogItem; 3] = [
    item("Flow Rate", "Convert fluid flow rates", "/units?type=flow-rate"),
    item("Viscosity", "Convert viscosity units", "/units?type=viscosity"),
    item("Surface Tension", "Convert surface tension units", "/units?type=surface-tension"),
];

const LIGHT: [CatalogItem; 3] = [
    item("Luminance", "Convert luminance units", "/units?type=luminance"),
    item("Illuminance", "Convert illuminance units", "/units?type=illuminance"),
    item("Luminous Intensity", "Convert luminous intensity units", "/units?type=luminous-intensity"),
];

const ELECTRICITY: [CatalogItem; 4] = [
    item("Electric Current", "Convert electric current units", "/units?type=electric-current"),
    item("Electric Potential", "Convert voltage units", "/units?type=electric-potential"),
    item("Electric Resistance", "Convert resistance units", "/units?type=electric-resistance"),
    item("Electric Capacitance", "Convert capacitance units", "/units?type=electric-capacitance"),
];

const MAGNETISM: [CatalogItem; 3] = [
    item("Magnetic Field", "Convert magnetic field units", "/units?type=magnetic-field"),
    item("Magnetic Flux", "Convert magnetic flux units", "/units?type=magnetic-flux"),
    item("Magnetic Flux Density", "Convert magnetic flux density units", "/units?type=magnetic-flux-density"),
];

const RADIOLOGY: [CatalogItem; 3] = [
    item("Radiation Dose", "Convert radiation dose units", "/units?type=radiation-dose"),
    item("Radioactivity", "Convert radioactivity units", "/units?type=radioactivity"),
    item("Radiation Exposure", "Convert radiation exposure units", "/units?type=radiation-exposure"),
];

/// Sections in landing-page order
pub static SECTIONS: [Section; 8] = [
    Section { title: "Basic Converters", items: &BASIC },
    Section { title: "Engineering Converters", items: &ENGINEERING },
    Section { title: "Heat Converters", items: &HEAT },
    Section { title: "Fluid Converters", items: &FLUID },
    Section { title: "Light Converters", items: &LIGHT },
    Section { title: "Electricity Converters", items: &ELECTRICITY },
    Section { title: "Magnetism Converters", items: &MAGNETISM },
    Section { title: "Radiology Converters", items: &RADIOLOGY },
];

/// A search match and the section it was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub section: &'static str,
    #[serde(flatten)]
    pub item: CatalogItem,
}

/// Case-insensitive substring search over title, description and section.
/// A blank query matches nothing.
pub fn search(query: &str) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    SECTIONS.iter()
        .flat_map(|section| section.items.iter().map(move |item| SearchHit { section: section.title, item: *item }))
        .filter(|hit| {
            hit.item.title.to_lowercase().contains(&needle)
                || hit.item.description.to_lowercase().contains(&needle)
                || hit.section.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Index of the section after `index`, wrapping to the first
pub fn next_section(index: usize) -> usize {
    (index % SECTIONS.len() + 1) % SECTIONS.len()
}

/// Index of the section before `index`, wrapping to the last
pub fn previous_section(index: usize) -> usize {
    (index % SECTIONS.len() + SECTIONS.len() - 1) % SECTIONS.len()
}

/// Section by case-insensitive title, with or without the " Converters" suffix
pub fn section(name: &str) -> Option<(usize, &'static Section)> {
    let name = name.trim();
    SECTIONS.iter().enumerate().find(|(_, s)| {
        s.title.eq_ignore_ascii_case(name)
            || s.title.strip_suffix(" Converters").is_some_and(|short| short.eq_ignore_ascii_case(name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_matches_nothing() {
        assert!(search("").is_empty());
        assert!(search("   ").is_empty());
    }

    #[test]
    fn test_search_title_case_insensitive() {
        let hits = search("TORQUE");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].item.href, "/units?type=torque");
        assert_eq!(hits[0].section, "Engineering Converters");
    }

    #[test]
    fn test_search_description() {
        let hits = search("voltage");
        assert_eq!(hits.iter().map(|h| h.item.title).collect::<Vec<_>>(), vec!["Electric Potential"]);
    }

    #[test]
    fn test_search_section_title() {
        let hits = search("magnetism");
        assert_eq!(hits.len(), 3);
        assert!(hits.iter().all(|h| h.section == "Magnetism Converters"));
    }

    #[test]
    fn test_temperature_listed_twice() {
        let hits = search("temperature");
        let sections: Vec<&str> = hits.iter().map(|h| h.section).collect();
        assert!(sections.contains(&"Engineering Converters"));
        assert!(sections.contains(&"Heat Converters"));
    }

    #[test]
    fn test_section_cycling_wraps() {
        assert_eq!(next_section(0), 1);
        assert_eq!(next_section(7), 0);
        assert_eq!(previous_section(0), 7);
        assert_eq!(previous_section(3), 2);
    }

    #[test]
    fn test_section_lookup() {
        assert_eq!(section("heat").map(|(i, _)| i), Some(2));
        assert_eq!(section("Light Converters").map(|(_, s)| s.items.len()), Some(3));
        assert!(section("plumbing").is_none());
    }
}
