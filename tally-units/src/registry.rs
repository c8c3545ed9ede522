//! Unit definitions - every conversion category, built once at start-up

use std::collections::HashMap;
use std::sync::LazyLock;
use crate::{ConversionCategory, UnitDefinition};

/// Global category registry
pub static CATEGORIES: LazyLock<CategoryRegistry> = LazyLock::new(CategoryRegistry::new);

const fn u(name: &'static str, symbol: &'static str, factor: f64) -> UnitDefinition {
    UnitDefinition::new(name, symbol, factor)
}

/// Registry of all conversion categories, in display order
pub struct CategoryRegistry {
    categories: Vec<ConversionCategory>,
    index: HashMap<&'static str, usize>,
    aliases: HashMap<&'static str, &'static str>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        let mut registry = CategoryRegistry {
            categories: Vec::new(),
            index: HashMap::new(),
            aliases: HashMap::new(),
        };
        registry.register_all_categories();
        registry
    }

    /// Get a category by slug or alias (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&ConversionCategory> {
        let key = name.trim().to_lowercase();
        let slug = self.aliases.get(key.as_str()).copied().unwrap_or(key.as_str());
        self.index.get(slug).map(|&i| &self.categories[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConversionCategory> {
        self.categories.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.categories.iter().map(|c| c.name).collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    fn register(&mut self, category: ConversionCategory) {
        self.index.insert(category.name, self.categories.len());
        self.categories.push(category);
    }

    fn alias(&mut self, alias: &'static str, name: &'static str) {
        self.aliases.insert(alias, name);
    }

    fn register_all_categories(&mut self) {
        self.register_engineering();
        self.register_heat();
        self.register_fluid();
        self.register_light();
        self.register_electricity();
        self.register_magnetism();
        self.register_radiology();

        self.alias("mass", "weight");
        self.alias("fuel-consumption", "fuel");
        self.alias("data-storage", "data");
        self.alias("moment-of-inertia", "inertia");
        self.alias("velocity", "speed");
    }

    fn register_engineering(&mut self) {
        self.register(ConversionCategory::multiplicative("length", "Length", &[
            u("Meter", "m", 1.0),
            u("Kilometer", "km", 1000.0),
            u("Centimeter", "cm", 0.01),
            u("Millimeter", "mm", 0.001),
            u("Micrometer", "µm", 1e-6),
            u("Nanometer", "nm", 1e-9),
            u("Mile", "mi", 1609.344),
            u("Yard", "yd", 0.9144),
            u("Foot", "ft", 0.3048),
            u("Inch", "in", 0.0254),
            u("Nautical Mile", "nmi", 1852.0),
            u("Light Year", "ly", 9.4607304725808e15),
        ]));

        self.register(ConversionCategory::multiplicative("volume", "Volume", &[
            u("Cubic Meter", "m³", 1.0),
            u("Liter", "L", 0.001),
            u("Milliliter", "mL", 1e-6),
            u("Cubic Centimeter", "cm³", 1e-6),
            u("Cubic Foot", "ft³", 0.028316846592),
            u("Cubic Inch", "in³", 1.6387064e-5),
            u("US Gallon", "gal", 0.003785411784),
            u("Imperial Gallon", "imp gal", 0.00454609),
            u("US Quart", "qt", 0.000946352946),
            u("US Pint", "pt", 0.000473176473),
            u("US Cup", "cup", 0.0002365882365),
            u("US Fluid Ounce", "fl oz", 2.95735295625e-5),
            u("Tablespoon", "tbsp", 1.478676478125e-5),
            u("Teaspoon", "tsp", 4.92892159375e-6),
        ]));

        self.register(ConversionCategory::multiplicative("area", "Area", &[
            u("Square Meter", "m²", 1.0),
            u("Square Kilometer", "km²", 1e6),
            u("Square Centimeter", "cm²", 1e-4),
            u("Square Millimeter", "mm²", 1e-6),
            u("Hectare", "ha", 1e4),
            u("Acre", "ac", 4046.8564224),
            u("Square Mile", "mi²", 2589988.110336),
            u("Square Yard", "yd²", 0.83612736),
            u("Square Foot", "ft²", 0.09290304),
            u("Square Inch", "in²", 0.00064516),
        ]));

        self.register(ConversionCategory::multiplicative("speed", "Speed", &[
            u("Meter per Second", "m/s", 1.0),
            u("Kilometer per Hour", "km/h", 1.0 / 3.6),
            u("Mile per Hour", "mph", 0.44704),
            u("Foot per Second", "ft/s", 0.3048),
            u("Knot", "kn", 1852.0 / 3600.0),
            u("Mach", "Ma", 340.29),
            u("Speed of Light", "c", 299792458.0),
        ]));

        self.register(ConversionCategory::multiplicative("energy", "Energy", &[
            u("Joule", "J", 1.0),
            u("Kilojoule", "kJ", 1000.0),
            u("Calorie", "cal", 4.184),
            u("Kilocalorie", "kcal", 4184.0),
            u("Watt-hour", "Wh", 3600.0),
            u("Kilowatt-hour", "kWh", 3.6e6),
            u("Electronvolt", "eV", 1.602176634e-19),
            u("British Thermal Unit", "BTU", 1055.05585262),
            u("Foot-pound", "ft·lbf", 1.3558179483314004),
            u("Erg", "erg", 1e-7),
        ]));

        self.register(ConversionCategory::multiplicative("force", "Force", &[
            u("Newton", "N", 1.0),
            u("Kilonewton", "kN", 1000.0),
            u("Dyne", "dyn", 1e-5),
            u("Pound-force", "lbf", 4.4482216152605),
            u("Kilogram-force", "kgf", 9.80665),
            u("Ounce-force", "ozf", 0.27801385095378125),
            u("Poundal", "pdl", 0.138254954376),
        ]));

        // Distance per volume only; L/100km is reciprocal and cannot share a factor table
        self.register(ConversionCategory::multiplicative("fuel", "Fuel Consumption", &[
            u("Kilometer per Liter", "km/L", 1.0),
            u("Meter per Liter", "m/L", 0.001),
            u("Mile per Liter", "mi/L", 1.609344),
            u("Mile per US Gallon", "mpg", 0.425143707),
            u("Mile per Imperial Gallon", "mpg (imp)", 0.354006189),
        ]));

        self.register(ConversionCategory::multiplicative("data", "Data Storage", &[
            u("Byte", "B", 1.0),
            u("Bit", "bit", 0.125),
            u("Kilobyte", "kB", 1e3),
            u("Megabyte", "MB", 1e6),
            u("Gigabyte", "GB", 1e9),
            u("Terabyte", "TB", 1e12),
            u("Petabyte", "PB", 1e15),
            u("Kibibyte", "KiB", 1024.0),
            u("Mebibyte", "MiB", 1048576.0),
            u("Gibibyte", "GiB", 1073741824.0),
            u("Tebibyte", "TiB", 1099511627776.0),
        ]));

        self.register(ConversionCategory::multiplicative("weight", "Weight & Mass", &[
            u("Kilogram", "kg", 1.0),
            u("Gram", "g", 0.001),
            u("Milligram", "mg", 1e-6),
            u("Metric Ton", "t", 1000.0),
            u("Pound", "lb", 0.45359237),
            u("Ounce", "oz", 0.028349523125),
            u("Stone", "st", 6.35029318),
            u("Short Ton", "ton", 907.18474),
            u("Long Ton", "LT", 1016.0469088),
            u("Carat", "ct", 0.0002),
        ]));

        self.register(ConversionCategory::multiplicative("pressure", "Pressure", &[
            u("Pascal", "Pa", 1.0),
            u("Kilopascal", "kPa", 1000.0),
            u("Megapascal", "MPa", 1e6),
            u("Bar", "bar", 1e5),
            u("Millibar", "mbar", 100.0),
            u("Atmosphere", "atm", 101325.0),
            u("Torr", "Torr", 101325.0 / 760.0),
            u("Millimeter of Mercury", "mmHg", 133.322387415),
            u("Inch of Mercury", "inHg", 3386.389),
            u("Pound per Square Inch", "psi", 6894.757293168361),
        ]));

        self.register(ConversionCategory::temperature("temperature", "Temperature", &[
            u("Celsius", "°C", 1.0),
            u("Fahrenheit", "°F", 1.0),
            u("Kelvin", "K", 1.0),
        ]));

        self.register(ConversionCategory::multiplicative("power", "Power", &[
            u("Watt", "W", 1.0),
            u("Kilowatt", "kW", 1000.0),
            u("Megawatt", "MW", 1e6),
            u("Horsepower", "hp", 745.6998715822702),
            u("Metric Horsepower", "PS", 735.49875),
            u("BTU per Hour", "BTU/h", 0.29307107017222),
            u("Foot-pound per Second", "ft·lbf/s", 1.3558179483314004),
            u("Calorie per Second", "cal/s", 4.184),
        ]));

        self.register(ConversionCategory::multiplicative("time", "Time", &[
            u("Second", "s", 1.0),
            u("Millisecond", "ms", 0.001),
            u("Microsecond", "µs", 1e-6),
            u("Nanosecond", "ns", 1e-9),
            u("Minute", "min", 60.0),
            u("Hour", "h", 3600.0),
            u("Day", "d", 86400.0),
            u("Week", "wk", 604800.0),
            u("Month", "mo", 2629746.0),
            u("Year", "yr", 31556952.0),
            u("Decade", "dec", 315569520.0),
            u("Century", "c", 3155695200.0),
        ]));

        self.register(ConversionCategory::multiplicative("angle", "Angle", &[
            u("Degree", "°", 1.0),
            u("Radian", "rad", 180.0 / std::f64::consts::PI),
            u("Gradian", "grad", 0.9),
            u("Arcminute", "′", 1.0 / 60.0),
            u("Arcsecond", "″", 1.0 / 3600.0),
            u("Milliradian", "mrad", 0.18 / std::f64::consts::PI),
            u("Revolution", "rev", 360.0),
        ]));

        self.register(ConversionCategory::multiplicative("volume-dry", "Volume (Dry)", &[
            u("Liter", "L", 1.0),
            u("Cubic Meter", "m³", 1000.0),
            u("US Bushel", "bu", 35.23907016688),
            u("US Peck", "pk", 8.80976754172),
            u("US Dry Quart", "dry qt", 1.101220942715),
            u("US Dry Pint", "dry pt", 0.5506104713575),
            u("US Dry Barrel", "bbl", 115.628198985075),
        ]));

        self.register(ConversionCategory::multiplicative("density", "Density", &[
            u("Kilogram per Cubic Meter", "kg/m³", 1.0),
            u("Gram per Cubic Centimeter", "g/cm³", 1000.0),
            u("Kilogram per Liter", "kg/L", 1000.0),
            u("Pound per Cubic Foot", "lb/ft³", 16.018463373960138),
            u("Pound per Cubic Inch", "lb/in³", 27679.904710203125),
            u("Pound per US Gallon", "lb/gal", 119.82642731689663),
            u("Ounce per Cubic Inch", "oz/in³", 1729.994044387695),
        ]));

        self.register(ConversionCategory::multiplicative("inertia", "Moment of Inertia", &[
            u("Kilogram Square Meter", "kg·m²", 1.0),
            u("Kilogram Square Centimeter", "kg·cm²", 1e-4),
            u("Gram Square Centimeter", "g·cm²", 1e-7),
            u("Pound Square Foot", "lb·ft²", 0.0421401100938048),
            u("Pound Square Inch", "lb·in²", 0.00029263965342920005),
            u("Slug Square Foot", "slug·ft²", 1.3558179483314004),
        ]));

        self.register(ConversionCategory::multiplicative("torque", "Torque", &[
            u("Newton Meter", "N·m", 1.0),
            u("Kilonewton Meter", "kN·m", 1000.0),
            u("Newton Centimeter", "N·cm", 0.01),
            u("Dyne Centimeter", "dyn·cm", 1e-7),
            u("Kilogram-force Meter", "kgf·m", 9.80665),
            u("Pound-force Foot", "lbf·ft", 1.3558179483314004),
            u("Pound-force Inch", "lbf·in", 0.1129848290276167),
            u("Ounce-force Inch", "ozf·in", 0.00706155181422604),
        ]));

        self.register(ConversionCategory::multiplicative("angular-velocity", "Angular Velocity", &[
            u("Radian per Second", "rad/s", 1.0),
            u("Radian per Minute", "rad/min", 1.0 / 60.0),
            u("Degree per Second", "°/s", std::f64::consts::PI / 180.0),
            u("Degree per Minute", "°/min", std::f64::consts::PI / 10800.0),
            u("Revolution per Second", "rev/s", std::f64::consts::TAU),
            u("Revolution per Minute", "rpm", std::f64::consts::TAU / 60.0),
        ]));

        self.register(ConversionCategory::multiplicative("angular-acceleration", "Angular Acceleration", &[
            u("Radian per Second Squared", "rad/s²", 1.0),
            u("Radian per Minute Squared", "rad/min²", 1.0 / 3600.0),
            u("Degree per Second Squared", "°/s²", std::f64::consts::PI / 180.0),
            u("Revolution per Second Squared", "rev/s²", std::f64::consts::TAU),
            u("Revolution per Minute per Second", "rpm/s", std::f64::consts::TAU / 60.0),
            u("Revolution per Minute Squared", "rev/min²", std::f64::consts::TAU / 3600.0),
        ]));

        self.register(ConversionCategory::multiplicative("specific-volume", "Specific Volume", &[
            u("Cubic Meter per Kilogram", "m³/kg", 1.0),
            u("Liter per Kilogram", "L/kg", 0.001),
            u("Cubic Centimeter per Gram", "cm³/g", 0.001),
            u("Cubic Foot per Pound", "ft³/lb", 0.062427960576144606),
            u("US Gallon per Pound", "gal/lb", 0.008345404452031),
        ]));

        self.register(ConversionCategory::multiplicative("moment-force", "Moment Force", &[
            u("Newton Meter", "N·m", 1.0),
            u("Kilonewton Meter", "kN·m", 1000.0),
            u("Kilogram-force Meter", "kgf·m", 9.80665),
            u("Kilogram-force Centimeter", "kgf·cm", 0.0980665),
            u("Ton-force Meter", "tf·m", 9806.65),
            u("Pound-force Foot", "lbf·ft", 1.3558179483314004),
            u("Pound-force Inch", "lbf·in", 0.1129848290276167),
        ]));
    }

    fn register_heat(&mut self) {
        self.register(ConversionCategory::multiplicative("heat-transfer", "Heat Transfer Coefficient", &[
            u("Watt per Square Meter Kelvin", "W/(m²·K)", 1.0),
            u("Kilowatt per Square Meter Kelvin", "kW/(m²·K)", 1000.0),
            u("Watt per Square Centimeter Celsius", "W/(cm²·°C)", 1e4),
            u("Kilocalorie per Hour Square Meter Celsius", "kcal/(h·m²·°C)", 1.163),
            u("Calorie per Second Square Centimeter Celsius", "cal/(s·cm²·°C)", 41868.0),
            u("BTU per Hour Square Foot Fahrenheit", "BTU/(h·ft²·°F)", 5.678263337),
        ]));

        self.register(ConversionCategory::multiplicative("thermal-conductivity", "Thermal Conductivity", &[
            u("Watt per Meter Kelvin", "W/(m·K)", 1.0),
            u("Kilowatt per Meter Kelvin", "kW/(m·K)", 1000.0),
            u("Watt per Centimeter Celsius", "W/(cm·°C)", 100.0),
            u("Kilocalorie per Hour Meter Celsius", "kcal/(h·m·°C)", 1.163),
            u("Calorie per Second Centimeter Celsius", "cal/(s·cm·°C)", 418.68),
            u("BTU per Hour Foot Fahrenheit", "BTU/(h·ft·°F)", 1.730734666),
        ]));

        self.register(ConversionCategory::multiplicative("heat-capacity", "Specific Heat Capacity", &[
            u("Joule per Kilogram Kelvin", "J/(kg·K)", 1.0),
            u("Kilojoule per Kilogram Kelvin", "kJ/(kg·K)", 1000.0),
            u("Calorie per Gram Celsius", "cal/(g·°C)", 4186.8),
            u("Kilocalorie per Kilogram Celsius", "kcal/(kg·°C)", 4186.8),
            u("BTU per Pound Fahrenheit", "BTU/(lb·°F)", 4186.8),
        ]));
    }

    fn register_fluid(&mut self) {
        self.register(ConversionCategory::multiplicative("flow-rate", "Flow Rate", &[
            u("Cubic Meter per Second", "m³/s", 1.0),
            u("Cubic Meter per Hour", "m³/h", 1.0 / 3600.0),
            u("Liter per Second", "L/s", 0.001),
            u("Liter per Minute", "L/min", 0.001 / 60.0),
            u("Cubic Foot per Second", "ft³/s", 0.028316846592),
            u("Cubic Foot per Minute", "cfm", 0.028316846592 / 60.0),
            u("US Gallon per Minute", "gpm", 0.003785411784 / 60.0),
            u("US Gallon per Hour", "gph", 0.003785411784 / 3600.0),
        ]));

        self.register(ConversionCategory::multiplicative("viscosity", "Dynamic Viscosity", &[
            u("Pascal Second", "Pa·s", 1.0),
            u("Millipascal Second", "mPa·s", 0.001),
            u("Poise", "P", 0.1),
            u("Centipoise", "cP", 0.001),
            u("Pound-force Second per Square Foot", "lbf·s/ft²", 47.88025898033584),
            u("Pound per Foot Second", "lb/(ft·s)", 1.4881639435695537),
        ]));

        self.register(ConversionCategory::multiplicative("surface-tension", "Surface Tension", &[
            u("Newton per Meter", "N/m", 1.0),
            u("Millinewton per Meter", "mN/m", 0.001),
            u("Dyne per Centimeter", "dyn/cm", 0.001),
            u("Gram-force per Centimeter", "gf/cm", 0.980665),
            u("Pound-force per Inch", "lbf/in", 175.12683524647636),
            u("Pound-force per Foot", "lbf/ft", 14.593902937206364),
        ]));
    }

    fn register_light(&mut self) {
        self.register(ConversionCategory::multiplicative("luminance", "Luminance", &[
            u("Candela per Square Meter", "cd/m²", 1.0),
            u("Candela per Square Centimeter", "cd/cm²", 1e4),
            u("Candela per Square Foot", "cd/ft²", 10.763910416709722),
            u("Candela per Square Inch", "cd/in²", 1550.0031000062),
            u("Stilb", "sb", 1e4),
            u("Lambert", "L", 1e4 / std::f64::consts::PI),
            u("Foot-lambert", "fL", 3.4262590996353905),
            u("Apostilb", "asb", 1.0 / std::f64::consts::PI),
        ]));

        self.register(ConversionCategory::multiplicative("illuminance", "Illuminance", &[
            u("Lux", "lx", 1.0),
            u("Kilolux", "klx", 1000.0),
            u("Foot-candle", "fc", 10.763910416709722),
            u("Phot", "ph", 1e4),
            u("Nox", "nx", 0.001),
        ]));

        self.register(ConversionCategory::multiplicative("luminous-intensity", "Luminous Intensity", &[
            u("Candela", "cd", 1.0),
            u("Millicandela", "mcd", 0.001),
            u("Candlepower", "cp", 0.981),
            u("Hefnerkerze", "HK", 0.903),
            u("Carcel", "carcel", 9.74),
        ]));
    }

    fn register_electricity(&mut self) {
        self.register(ConversionCategory::multiplicative("electric-current", "Electric Current", &[
            u("Ampere", "A", 1.0),
            u("Milliampere", "mA", 0.001),
            u("Microampere", "µA", 1e-6),
            u("Kiloampere", "kA", 1000.0),
            u("Abampere", "abA", 10.0),
            u("Statampere", "statA", 3.3356409519815204e-10),
        ]));

        self.register(ConversionCategory::multiplicative("electric-potential", "Electric Potential", &[
            u("Volt", "V", 1.0),
            u("Millivolt", "mV", 0.001),
            u("Microvolt", "µV", 1e-6),
            u("Kilovolt", "kV", 1000.0),
            u("Megavolt", "MV", 1e6),
            u("Abvolt", "abV", 1e-8),
            u("Statvolt", "statV", 299.792458),
        ]));

        self.register(ConversionCategory::multiplicative("electric-resistance", "Electric Resistance", &[
            u("Ohm", "Ω", 1.0),
            u("Milliohm", "mΩ", 0.001),
            u("Kiloohm", "kΩ", 1000.0),
            u("Megaohm", "MΩ", 1e6),
            u("Abohm", "abΩ", 1e-9),
            u("Statohm", "statΩ", 8.987551787368176e11),
        ]));

        self.register(ConversionCategory::multiplicative("electric-capacitance", "Electric Capacitance", &[
            u("Farad", "F", 1.0),
            u("Millifarad", "mF", 1e-3),
            u("Microfarad", "µF", 1e-6),
            u("Nanofarad", "nF", 1e-9),
            u("Picofarad", "pF", 1e-12),
            u("Abfarad", "abF", 1e9),
            u("Statfarad", "statF", 1.1126500560536185e-12),
        ]));
    }

    fn register_magnetism(&mut self) {
        self.register(ConversionCategory::multiplicative("magnetic-field", "Magnetic Field Strength", &[
            u("Ampere per Meter", "A/m", 1.0),
            u("Milliampere per Meter", "mA/m", 0.001),
            u("Kiloampere per Meter", "kA/m", 1000.0),
            u("Oersted", "Oe", 1000.0 / (4.0 * std::f64::consts::PI)),
        ]));

        self.register(ConversionCategory::multiplicative("magnetic-flux", "Magnetic Flux", &[
            u("Weber", "Wb", 1.0),
            u("Milliweber", "mWb", 1e-3),
            u("Microweber", "µWb", 1e-6),
            u("Kilomaxwell", "kMx", 1e-5),
            u("Maxwell", "Mx", 1e-8),
        ]));

        self.register(ConversionCategory::multiplicative("magnetic-flux-density", "Magnetic Flux Density", &[
            u("Tesla", "T", 1.0),
            u("Millitesla", "mT", 1e-3),
            u("Microtesla", "µT", 1e-6),
            u("Kilogauss", "kG", 0.1),
            u("Gauss", "G", 1e-4),
            u("Gamma", "γ", 1e-9),
        ]));
    }

    fn register_radiology(&mut self) {
        self.register(ConversionCategory::multiplicative("radiation-dose", "Absorbed Radiation Dose", &[
            u("Gray", "Gy", 1.0),
            u("Milligray", "mGy", 1e-3),
            u("Kilogray", "kGy", 1000.0),
            u("Rad", "rad", 0.01),
            u("Millirad", "mrad", 1e-5),
        ]));

        self.register(ConversionCategory::multiplicative("radioactivity", "Radioactivity", &[
            u("Becquerel", "Bq", 1.0),
            u("Kilobecquerel", "kBq", 1e3),
            u("Megabecquerel", "MBq", 1e6),
            u("Gigabecquerel", "GBq", 1e9),
            u("Curie", "Ci", 3.7e10),
            u("Millicurie", "mCi", 3.7e7),
            u("Microcurie", "µCi", 3.7e4),
            u("Rutherford", "Rd", 1e6),
        ]));

        self.register(ConversionCategory::multiplicative("radiation-exposure", "Radiation Exposure", &[
            u("Coulomb per Kilogram", "C/kg", 1.0),
            u("Millicoulomb per Kilogram", "mC/kg", 1e-3),
            u("Roentgen", "R", 2.58e-4),
            u("Milliroentgen", "mR", 2.58e-7),
        ]));
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CategoryKind;
    use std::collections::HashSet;

    #[test]
    fn test_category_lookup_and_aliases() {
        assert_eq!(CATEGORIES.get("length").map(|c| c.title), Some("Length"));
        assert_eq!(CATEGORIES.get("Pressure").map(|c| c.name), Some("pressure"));
        assert_eq!(CATEGORIES.get("mass").map(|c| c.name), Some("weight"));
        assert!(CATEGORIES.get("vibes").is_none());
    }

    #[test]
    fn test_every_routed_category_is_registered() {
        for name in [
            "length", "volume", "area", "speed", "energy", "force", "fuel", "data",
            "weight", "pressure", "temperature", "power", "time", "angle", "volume-dry",
            "density", "inertia", "torque", "angular-velocity", "angular-acceleration",
            "specific-volume", "moment-force", "heat-transfer", "thermal-conductivity",
            "heat-capacity", "flow-rate", "viscosity", "surface-tension", "luminance",
            "illuminance", "luminous-intensity", "electric-current", "electric-potential",
            "electric-resistance", "electric-capacitance", "magnetic-field", "magnetic-flux",
            "magnetic-flux-density", "radiation-dose", "radioactivity", "radiation-exposure",
        ] {
            assert!(CATEGORIES.get(name).is_some(), "missing category {}", name);
        }
        assert_eq!(CATEGORIES.len(), 41);
    }

    #[test]
    fn test_multiplicative_categories_have_exactly_one_base() {
        for cat in CATEGORIES.iter().filter(|c| c.kind == CategoryKind::Multiplicative) {
            let bases = cat.units.iter().filter(|u| u.is_base()).count();
            assert_eq!(bases, 1, "category {} has {} base units", cat.name, bases);
        }
    }

    #[test]
    fn test_categories_are_well_formed() {
        let mut slugs = HashSet::new();
        for cat in CATEGORIES.iter() {
            assert!(slugs.insert(cat.name), "duplicate category {}", cat.name);
            assert!(cat.units.len() >= 2, "category {} has too few units", cat.name);
            let mut names = HashSet::new();
            for unit in &cat.units {
                assert!(unit.factor > 0.0 && unit.factor.is_finite(), "{} / {}", cat.name, unit.name);
                assert!(names.insert(unit.name), "duplicate unit {} in {}", unit.name, cat.name);
            }
        }
    }

    #[test]
    fn test_only_temperature_is_affine() {
        let affine: Vec<&str> = CATEGORIES.iter()
            .filter(|c| c.kind == CategoryKind::Temperature)
            .map(|c| c.name)
            .collect();
        assert_eq!(affine, vec!["temperature"]);
    }
}
