//! Sample files offered for download on the upload page.

pub const ADDRESS_TEMPLATE_FILENAME: &str = "facility_template_address.csv";
pub const COORDINATES_TEMPLATE_FILENAME: &str = "facility_template_coordinates.csv";

pub const ADDRESS_TEMPLATE: &str = "\
company_name,legend_color,facility_name,address,tags
Acme Logistics,#FF5733,Acme Minneapolis,\"100 Main St, Minneapolis, MN 55401\",\"warehouse, cold storage\"
Acme Logistics,#FF5733,,\"2500 University Ave W, St Paul, MN 55114\",warehouse
Northwind Freight,#3366CC,Northwind Duluth,\"1 Harbor Dr, Duluth, MN 55802\",\"port, hazmat\"
";

pub const COORDINATES_TEMPLATE: &str = "\
company_name,legend_color,facility_name,latitude,longitude,tags
Acme Logistics,#FF5733,Acme Minneapolis,44.9778,-93.2650,\"warehouse, cold storage\"
Acme Logistics,#FF5733,,44.9537,-93.0900,warehouse
Northwind Freight,#3366CC,Northwind Duluth,46.7867,-92.1005,\"port, hazmat\"
";

/// Which template to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Address,
    Coordinates,
}

impl TemplateKind {
    pub fn filename(&self) -> &'static str {
        match self {
            Self::Address => ADDRESS_TEMPLATE_FILENAME,
            Self::Coordinates => COORDINATES_TEMPLATE_FILENAME,
        }
    }

    pub fn body(&self) -> &'static str {
        match self {
            Self::Address => ADDRESS_TEMPLATE,
            Self::Coordinates => COORDINATES_TEMPLATE,
        }
    }
}
