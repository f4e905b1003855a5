/// BOM (Bill of Materials) section
#[derive(Debug, Clone, Default)]
pub struct Bom {
    pub name: String,
    pub items: Vec<BomItem>,
}

/// BomItem represents a part in the bill of materials
#[derive(Debug, Clone)]
pub struct BomItem {
    pub oem_design_number_ref: String,
    pub quantity: u32,
    pub pin_count: u32,
    pub category: BomCategory,
    pub ref_des_list: Vec<BomRefDes>,
    pub characteristics: Characteristics,
}

/// RefDes reference in BOM
#[derive(Debug, Clone)]
pub struct BomRefDes {
    pub name: String,
    pub package_ref: String,
    pub populate: bool,
    pub layer_ref: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BomCategory {
    Electrical,
}

impl BomCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BomCategory::Electrical => "ELECTRICAL",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Characteristics {
    pub category: BomCategory,
    pub textuals: Vec<TextualCharacteristic>,
}

#[derive(Debug, Clone)]
pub struct TextualCharacteristic {
    pub definition_source: String,
    pub name: String,
    pub value: String,
}
