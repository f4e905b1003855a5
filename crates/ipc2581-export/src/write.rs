//! XML serializer
//!
//! A single read-only pass over an assembled [`Ipc2581`] document. Lengths
//! are held in meters and converted to the document units here, once.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use std::io::{Cursor, Write};

use crate::Result;
use crate::geometry::{PolyChain, PolyStep, Polygon};
use crate::types::*;
use crate::units::{Units, format_degrees, format_length, format_number};

/// Render `document` as an indented XML string
pub fn to_xml_string(document: &Ipc2581) -> Result<String> {
    let cursor = write_document(document, Cursor::new(Vec::new()))?;
    let mut xml = String::from_utf8(cursor.into_inner())?;
    xml.push('\n');
    Ok(xml)
}

/// Serialize `document` into `out`, returning the sink
pub fn write_document<W: Write>(document: &Ipc2581, out: W) -> Result<W> {
    let mut writer = DocumentWriter {
        writer: Writer::new_with_indent(out, b' ', 2),
        units: document.units(),
    };
    writer.document(document)?;
    Ok(writer.writer.into_inner())
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

struct DocumentWriter<W: Write> {
    writer: Writer<W>,
    units: Units,
}

impl<W: Write> DocumentWriter<W> {
    fn len(&self, meters: f64) -> String {
        format_length(meters, self.units)
    }

    fn start(&mut self, elem: BytesStart<'_>) -> Result<()> {
        self.writer.write_event(Event::Start(elem))?;
        Ok(())
    }

    fn empty(&mut self, elem: BytesStart<'_>) -> Result<()> {
        self.writer.write_event(Event::Empty(elem))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Empty element carrying a single attribute
    fn empty_with(&mut self, name: &str, key: &str, value: &str) -> Result<()> {
        let mut elem = BytesStart::new(name);
        elem.push_attribute((key, value));
        self.empty(elem)
    }

    fn location(&mut self, x: f64, y: f64) -> Result<()> {
        let mut elem = BytesStart::new("Location");
        elem.push_attribute(("x", self.len(x).as_str()));
        elem.push_attribute(("y", self.len(y).as_str()));
        self.empty(elem)
    }

    fn xform(&mut self, xform: &Xform) -> Result<()> {
        if xform.is_identity() {
            return Ok(());
        }
        let mut elem = BytesStart::new("Xform");
        elem.push_attribute(("rotation", format_degrees(xform.rotation).as_str()));
        if xform.mirror {
            elem.push_attribute(("mirror", "true"));
        }
        self.empty(elem)
    }

    fn document(&mut self, document: &Ipc2581) -> Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new("IPC-2581");
        root.push_attribute(("revision", document.revision.as_str()));
        root.push_attribute(("xmlns", NAMESPACE));
        root.push_attribute(("xmlns:xsi", NAMESPACE_XSI));
        root.push_attribute(("xmlns:xsd", NAMESPACE_XSD));
        self.start(root)?;

        self.content(&document.content)?;
        self.logistic_header(&document.logistic_header)?;
        self.history_record(&document.history_record)?;
        self.bom(&document.bom, &document.content.step_ref, &document.ecad.name)?;
        self.ecad(&document.ecad)?;

        self.end("IPC-2581")
    }

    fn content(&mut self, content: &Content) -> Result<()> {
        let mut elem = BytesStart::new("Content");
        elem.push_attribute(("roleRef", content.role_ref.as_str()));
        self.start(elem)?;

        let mut mode = BytesStart::new("FunctionMode");
        mode.push_attribute(("mode", content.function_mode.mode.keyword()));
        if let Some(level) = content.function_mode.level {
            mode.push_attribute(("level", level.to_string().as_str()));
        }
        self.empty(mode)?;
        self.empty_with("StepRef", "name", &content.step_ref)?;
        for layer in &content.layer_refs {
            self.empty_with("LayerRef", "name", layer)?;
        }
        self.empty_with("BomRef", "name", &content.bom_ref)?;

        let dictionaries = &content.dictionaries;
        self.dictionary_standard(&dictionaries.standard)?;
        self.dictionary_line_desc(&dictionaries.line_desc)?;
        self.dictionary_color(&dictionaries.color)?;

        self.end("Content")
    }

    fn dictionary_standard(&mut self, standard: &GeometryInterner) -> Result<()> {
        let mut elem = BytesStart::new("DictionaryStandard");
        elem.push_attribute(("units", self.units.keyword()));
        self.start(elem)?;
        for entry in standard.entries() {
            self.start(BytesStart::new("EntryStandard").with_attributes([("id", entry.id.as_str())]))?;
            self.standard_shape(&entry.value)?;
            self.end("EntryStandard")?;
        }
        self.end("DictionaryStandard")
    }

    fn standard_shape(&mut self, shape: &StandardShape) -> Result<()> {
        match *shape {
            StandardShape::Circle { diameter } => {
                let diameter = self.len(diameter);
                self.empty_with("Circle", "diameter", &diameter)
            }
            StandardShape::Default => self.empty_with("Circle", "diameter", "0"),
            StandardShape::Rect { width, height } => {
                let mut elem = BytesStart::new("RectCenter");
                elem.push_attribute(("width", self.len(width).as_str()));
                elem.push_attribute(("height", self.len(height).as_str()));
                self.empty(elem)
            }
            StandardShape::Oval {
                major,
                minor,
                corner,
            } => {
                let name = if corner == 0.0 { "Oval" } else { "RectRound" };
                let mut elem = BytesStart::new(name);
                elem.push_attribute(("width", self.len(major).as_str()));
                elem.push_attribute(("height", self.len(minor).as_str()));
                if corner != 0.0 {
                    elem.push_attribute(("radius", self.len(corner).as_str()));
                    for side in ["upperRight", "upperLeft", "lowerRight", "lowerLeft"] {
                        elem.push_attribute((side, "true"));
                    }
                }
                self.empty(elem)
            }
        }
    }

    fn dictionary_line_desc(&mut self, lines: &LineDescInterner) -> Result<()> {
        let mut elem = BytesStart::new("DictionaryLineDesc");
        elem.push_attribute(("units", self.units.keyword()));
        self.start(elem)?;
        for entry in lines.entries() {
            self.start(BytesStart::new("EntryLineDesc").with_attributes([("id", entry.id.as_str())]))?;
            let mut line = BytesStart::new("LineDesc");
            line.push_attribute(("lineEnd", "ROUND"));
            line.push_attribute(("lineWidth", self.len(entry.value.line_width).as_str()));
            self.empty(line)?;
            self.end("EntryLineDesc")?;
        }
        self.end("DictionaryLineDesc")
    }

    fn dictionary_color(&mut self, colors: &ColorDictionary) -> Result<()> {
        self.start(BytesStart::new("DictionaryColor"))?;
        for entry in colors.entries() {
            self.start(BytesStart::new("EntryColor").with_attributes([("id", entry.id.as_str())]))?;
            let Color { r, g, b } = entry.value;
            let mut color = BytesStart::new("Color");
            color.push_attribute(("r", r.to_string().as_str()));
            color.push_attribute(("g", g.to_string().as_str()));
            color.push_attribute(("b", b.to_string().as_str()));
            self.empty(color)?;
            self.end("EntryColor")?;
        }
        self.end("DictionaryColor")
    }

    fn logistic_header(&mut self, header: &LogisticHeader) -> Result<()> {
        self.start(BytesStart::new("LogisticHeader"))?;

        let mut role = BytesStart::new("Role");
        role.push_attribute(("id", header.role.id.as_str()));
        role.push_attribute(("roleFunction", header.role.role_function.as_str()));
        self.empty(role)?;

        let mut enterprise = BytesStart::new("Enterprise");
        enterprise.push_attribute(("id", header.enterprise.id.as_str()));
        enterprise.push_attribute(("code", header.enterprise.code.as_str()));
        self.empty(enterprise)?;

        let mut person = BytesStart::new("Person");
        person.push_attribute(("name", header.person.name.as_str()));
        person.push_attribute(("enterpriseRef", header.person.enterprise_ref.as_str()));
        person.push_attribute(("roleRef", header.person.role_ref.as_str()));
        self.empty(person)?;

        self.end("LogisticHeader")
    }

    fn history_record(&mut self, history: &HistoryRecord) -> Result<()> {
        let mut record = BytesStart::new("HistoryRecord");
        record.push_attribute(("number", history.number.to_string().as_str()));
        record.push_attribute(("origination", history.origination.as_str()));
        record.push_attribute(("software", history.software.as_str()));
        record.push_attribute(("lastChange", history.last_change.as_str()));
        self.start(record)?;

        let revision = &history.file_revision;
        let mut file_revision = BytesStart::new("FileRevision");
        file_revision.push_attribute(("fileRevisionId", revision.file_revision_id.as_str()));
        file_revision.push_attribute(("comment", revision.comment.as_str()));
        file_revision.push_attribute(("label", ""));
        self.start(file_revision)?;

        let package = &revision.software_package;
        let mut software = BytesStart::new("SoftwarePackage");
        software.push_attribute(("name", package.name.as_str()));
        software.push_attribute(("revision", package.revision.as_str()));
        software.push_attribute(("vendor", package.vendor.as_str()));
        self.start(software)?;
        self.empty_with(
            "Certification",
            "certificationStatus",
            &package.certification_status,
        )?;
        self.end("SoftwarePackage")?;

        self.end("FileRevision")?;
        self.end("HistoryRecord")
    }

    fn bom(&mut self, bom: &Bom, step_ref: &str, assembly: &str) -> Result<()> {
        self.start(BytesStart::new("Bom").with_attributes([("name", bom.name.as_str())]))?;

        let mut header = BytesStart::new("BomHeader");
        header.push_attribute(("assembly", assembly));
        header.push_attribute(("revision", "1.0"));
        self.start(header)?;
        self.empty_with("StepRef", "name", step_ref)?;
        self.end("BomHeader")?;

        for item in &bom.items {
            let mut elem = BytesStart::new("BomItem");
            elem.push_attribute(("OEMDesignNumberRef", item.oem_design_number_ref.as_str()));
            elem.push_attribute(("quantity", item.quantity.to_string().as_str()));
            elem.push_attribute(("pinCount", item.pin_count.to_string().as_str()));
            elem.push_attribute(("category", item.category.as_str()));
            self.start(elem)?;

            for ref_des in &item.ref_des_list {
                let mut elem = BytesStart::new("RefDes");
                elem.push_attribute(("name", ref_des.name.as_str()));
                elem.push_attribute(("packageRef", ref_des.package_ref.as_str()));
                elem.push_attribute(("populate", bool_str(ref_des.populate)));
                elem.push_attribute(("layerRef", ref_des.layer_ref.as_str()));
                self.empty(elem)?;
            }

            let characteristics = &item.characteristics;
            self.start(
                BytesStart::new("Characteristics")
                    .with_attributes([("category", characteristics.category.as_str())]),
            )?;
            for textual in &characteristics.textuals {
                let mut elem = BytesStart::new("Textual");
                elem.push_attribute(("definitionSource", textual.definition_source.as_str()));
                elem.push_attribute(("textualCharacteristicName", textual.name.as_str()));
                elem.push_attribute(("textualCharacteristicValue", textual.value.as_str()));
                self.empty(elem)?;
            }
            self.end("Characteristics")?;

            self.end("BomItem")?;
        }

        self.end("Bom")
    }

    fn ecad(&mut self, ecad: &Ecad) -> Result<()> {
        self.start(BytesStart::new("Ecad").with_attributes([("name", ecad.name.as_str())]))?;

        self.start(
            BytesStart::new("CadHeader").with_attributes([("units", ecad.cad_header.units.keyword())]),
        )?;
        for spec in &ecad.cad_header.specs {
            self.spec(spec)?;
        }
        self.end("CadHeader")?;

        self.start(BytesStart::new("CadData"))?;
        for layer in &ecad.cad_data.layers {
            self.layer(layer)?;
        }
        self.stackup(&ecad.cad_data.stackup)?;
        self.step(&ecad.cad_data.step)?;
        self.end("CadData")?;

        self.end("Ecad")
    }

    fn spec(&mut self, spec: &Spec) -> Result<()> {
        self.start(BytesStart::new("Spec").with_attributes([("name", spec.name.as_str())]))?;
        if let Some(material) = &spec.material {
            self.start(BytesStart::new("General").with_attributes([("type", "MATERIAL")]))?;
            self.empty_with("Property", "text", material)?;
            self.end("General")?;
        }
        if let Some(conductivity) = spec.conductivity {
            self.start(BytesStart::new("Conductor").with_attributes([("type", "CONDUCTIVITY")]))?;
            let mut property = BytesStart::new("Property");
            property.push_attribute(("value", format_number(conductivity).as_str()));
            property.push_attribute(("unit", "SIEMENS/M"));
            self.empty(property)?;
            self.end("Conductor")?;
        }
        let dielectric = [
            ("DIELECTRIC_CONSTANT", spec.dielectric_constant),
            ("LOSS_TANGENT", spec.loss_tangent),
        ];
        for (kind, value) in dielectric {
            let Some(value) = value else { continue };
            self.start(BytesStart::new("Dielectric").with_attributes([("type", kind)]))?;
            self.empty_with("Property", "value", &format_number(value))?;
            self.end("Dielectric")?;
        }
        self.end("Spec")
    }

    fn layer(&mut self, layer: &Layer) -> Result<()> {
        let mut elem = BytesStart::new("Layer");
        elem.push_attribute(("name", layer.name.as_str()));
        elem.push_attribute(("layerFunction", layer.layer_function.as_str()));
        elem.push_attribute(("side", layer.side.as_str()));
        elem.push_attribute(("polarity", layer.polarity.as_str()));
        let Some(span) = &layer.span else {
            return self.empty(elem);
        };
        self.start(elem)?;
        let mut span_elem = BytesStart::new("Span");
        span_elem.push_attribute(("fromLayer", span.from_layer.as_str()));
        span_elem.push_attribute(("toLayer", span.to_layer.as_str()));
        self.empty(span_elem)?;
        self.end("Layer")
    }

    fn stackup(&mut self, stackup: &Stackup) -> Result<()> {
        let thickness = self.len(stackup.overall_thickness);
        let mut elem = BytesStart::new("Stackup");
        elem.push_attribute(("name", stackup.name.as_str()));
        elem.push_attribute(("overallThickness", thickness.as_str()));
        elem.push_attribute(("tolPlus", "0"));
        elem.push_attribute(("tolMinus", "0"));
        elem.push_attribute(("whereMeasured", "METAL"));
        self.start(elem)?;

        let mut group = BytesStart::new("StackupGroup");
        group.push_attribute(("name", stackup.name.as_str()));
        group.push_attribute(("thickness", thickness.as_str()));
        group.push_attribute(("tolPlus", "0"));
        group.push_attribute(("tolMinus", "0"));
        self.start(group)?;
        for layer in &stackup.layers {
            let mut elem = BytesStart::new("StackupLayer");
            elem.push_attribute(("layerOrGroupRef", layer.layer_ref.as_str()));
            elem.push_attribute(("thickness", self.len(layer.thickness).as_str()));
            elem.push_attribute(("tolPlus", self.len(layer.tol_plus).as_str()));
            elem.push_attribute(("tolMinus", self.len(layer.tol_minus).as_str()));
            elem.push_attribute(("sequence", layer.sequence.to_string().as_str()));
            self.start(elem)?;
            self.empty_with("SpecRef", "id", &layer.spec_ref)?;
            self.end("StackupLayer")?;
        }
        self.end("StackupGroup")?;

        self.end("Stackup")
    }

    fn step(&mut self, step: &Step) -> Result<()> {
        self.start(BytesStart::new("Step").with_attributes([("name", step.name.as_str())]))?;

        for def in step.padstack_defs.values() {
            self.padstack_def(def)?;
        }

        let mut datum = BytesStart::new("Datum");
        datum.push_attribute(("x", self.len(step.datum.x).as_str()));
        datum.push_attribute(("y", self.len(step.datum.y).as_str()));
        self.empty(datum)?;

        if let Some(profile) = &step.profile {
            self.start(BytesStart::new("Profile"))?;
            self.polygon_chain("Polygon", &profile.polygon.outline, Some(&profile.line_desc_ref))?;
            self.end("Profile")?;
        }

        for package in step.packages.values() {
            self.package(package)?;
        }
        for component in &step.components {
            self.component(component)?;
        }
        for net in &step.logical_nets {
            self.logical_net(net)?;
        }
        if let Some(group) = &step.phy_net_group {
            self.phy_net_group(group)?;
        }
        for layer_feature in &step.layer_features {
            self.layer_feature(layer_feature)?;
        }

        self.end("Step")
    }

    fn padstack_def(&mut self, def: &PadStackDef) -> Result<()> {
        self.start(BytesStart::new("PadStackDef").with_attributes([("name", def.name.as_str())]))?;
        if let Some(hole) = &def.hole_def {
            let mut elem = BytesStart::new("PadstackHoleDef");
            elem.push_attribute(("name", hole.name.as_str()));
            elem.push_attribute(("diameter", self.len(hole.diameter).as_str()));
            elem.push_attribute(("platingStatus", hole.plating_status.as_str()));
            elem.push_attribute(("plusTol", self.len(hole.plus_tol).as_str()));
            elem.push_attribute(("minusTol", self.len(hole.minus_tol).as_str()));
            elem.push_attribute(("x", "0"));
            elem.push_attribute(("y", "0"));
            self.empty(elem)?;
        }
        for pad in &def.pad_defs {
            let mut elem = BytesStart::new("PadstackPadDef");
            elem.push_attribute(("layerRef", pad.layer_ref.as_str()));
            elem.push_attribute(("padUse", pad.pad_use.as_str()));
            self.start(elem)?;
            self.location(0.0, 0.0)?;
            self.empty_with("StandardPrimitiveRef", "id", &pad.primitive_ref)?;
            self.end("PadstackPadDef")?;
        }
        self.end("PadStackDef")
    }

    fn chain_steps(&mut self, chain: &PolyChain) -> Result<()> {
        let mut begin = BytesStart::new("PolyBegin");
        begin.push_attribute(("x", self.len(chain.begin.x).as_str()));
        begin.push_attribute(("y", self.len(chain.begin.y).as_str()));
        self.empty(begin)?;

        for step in &chain.steps {
            let elem = match *step {
                PolyStep::Segment { end } => {
                    let mut elem = BytesStart::new("PolyStepSegment");
                    elem.push_attribute(("x", self.len(end.x).as_str()));
                    elem.push_attribute(("y", self.len(end.y).as_str()));
                    elem
                }
                PolyStep::Curve {
                    end,
                    center,
                    clockwise,
                } => {
                    let mut elem = BytesStart::new("PolyStepCurve");
                    elem.push_attribute(("x", self.len(end.x).as_str()));
                    elem.push_attribute(("y", self.len(end.y).as_str()));
                    elem.push_attribute(("centerX", self.len(center.x).as_str()));
                    elem.push_attribute(("centerY", self.len(center.y).as_str()));
                    elem.push_attribute(("clockwise", bool_str(clockwise)));
                    elem
                }
            };
            self.empty(elem)?;
        }
        Ok(())
    }

    /// `<name>` wrapping one chain, optionally closed by a line style reference
    fn polygon_chain(&mut self, name: &str, chain: &PolyChain, line_desc_ref: Option<&str>) -> Result<()> {
        self.start(BytesStart::new(name))?;
        self.chain_steps(chain)?;
        if let Some(id) = line_desc_ref {
            self.empty_with("LineDescRef", "id", id)?;
        }
        self.end(name)
    }

    fn contour(&mut self, polygon: &Polygon) -> Result<()> {
        self.start(BytesStart::new("Contour"))?;
        self.polygon_chain("Polygon", &polygon.outline, None)?;
        for cutout in &polygon.cutouts {
            self.polygon_chain("Cutout", cutout, None)?;
        }
        self.end("Contour")
    }

    fn package(&mut self, package: &Package) -> Result<()> {
        let mut elem = BytesStart::new("Package");
        elem.push_attribute(("name", package.name.as_str()));
        elem.push_attribute(("type", package.package_type.as_str()));
        if let Some(pin_one) = &package.pin_one {
            elem.push_attribute(("pinOne", pin_one.as_str()));
        }
        elem.push_attribute(("pinOneOrientation", package.pin_one_orientation.as_str()));
        if let Some(height) = package.height {
            elem.push_attribute(("height", self.len(height).as_str()));
        }
        self.start(elem)?;

        self.start(BytesStart::new("Outline"))?;
        self.polygon_chain("Polygon", &package.outline.outline, None)?;
        self.empty_with("LineDescRef", "id", &package.line_desc_ref)?;
        self.end("Outline")?;

        self.start(BytesStart::new("AssemblyDrawing"))?;
        self.start(BytesStart::new("Outline"))?;
        self.polygon_chain("Polygon", &package.assembly_drawing.outline, None)?;
        self.empty_with("LineDescRef", "id", &package.line_desc_ref)?;
        self.end("Outline")?;
        self.end("AssemblyDrawing")?;

        for pin in &package.pins {
            let mut elem = BytesStart::new("Pin");
            elem.push_attribute(("number", pin.number.as_str()));
            elem.push_attribute(("type", pin.pin_type.as_str()));
            elem.push_attribute(("electricalType", "ELECTRICAL"));
            self.start(elem)?;
            self.xform(&Xform {
                rotation: pin.rotation,
                mirror: false,
            })?;
            self.location(pin.location.x, pin.location.y)?;
            if let Some(id) = &pin.primitive_ref {
                self.empty_with("StandardPrimitiveRef", "id", id)?;
            }
            self.end("Pin")?;
        }

        self.end("Package")
    }

    fn component(&mut self, component: &Component) -> Result<()> {
        let mut elem = BytesStart::new("Component");
        elem.push_attribute(("refDes", component.ref_des.as_str()));
        elem.push_attribute(("packageRef", component.package_ref.as_str()));
        elem.push_attribute(("layerRef", component.layer_ref.as_str()));
        elem.push_attribute(("part", component.part.as_str()));
        elem.push_attribute(("mountType", component.mount_type.as_str()));
        if let Some(value) = &component.value {
            elem.push_attribute(("value", value.as_str()));
        }
        self.start(elem)?;
        self.xform(&component.xform)?;
        self.location(component.location.x, component.location.y)?;
        self.end("Component")
    }

    fn logical_net(&mut self, net: &LogicalNet) -> Result<()> {
        let elem = BytesStart::new("LogicalNet").with_attributes([("name", net.name.as_str())]);
        if net.pin_refs.is_empty() {
            return self.empty(elem);
        }
        self.start(elem)?;
        for pin_ref in &net.pin_refs {
            self.pin_ref(pin_ref)?;
        }
        self.end("LogicalNet")
    }

    fn pin_ref(&mut self, pin_ref: &PinRef) -> Result<()> {
        let mut elem = BytesStart::new("PinRef");
        elem.push_attribute(("pin", pin_ref.pin.as_str()));
        elem.push_attribute(("componentRef", pin_ref.component_ref.as_str()));
        self.empty(elem)
    }

    fn phy_net_group(&mut self, group: &PhyNetGroup) -> Result<()> {
        self.start(BytesStart::new("PhyNetGroup").with_attributes([("name", group.name.as_str())]))?;
        for net in &group.phy_nets {
            self.start(BytesStart::new("PhyNet").with_attributes([("name", net.name.as_str())]))?;
            for point in &net.points {
                let mut elem = BytesStart::new("PhyNetPoint");
                elem.push_attribute(("x", self.len(point.x).as_str()));
                elem.push_attribute(("y", self.len(point.y).as_str()));
                elem.push_attribute(("layerRef", point.layer_ref.as_str()));
                elem.push_attribute(("netNode", point.net_node.as_str()));
                elem.push_attribute(("exposure", point.exposure.as_str()));
                elem.push_attribute(("via", bool_str(point.via)));
                match &point.primitive_ref {
                    Some(id) => {
                        self.start(elem)?;
                        self.empty_with("StandardPrimitiveRef", "id", id)?;
                        self.end("PhyNetPoint")?;
                    }
                    None => self.empty(elem)?,
                }
            }
            self.end("PhyNet")?;
        }
        self.end("PhyNetGroup")
    }

    fn layer_feature(&mut self, layer_feature: &LayerFeature) -> Result<()> {
        if !layer_feature.features.iter().any(Feature::has_geometry) {
            return Ok(());
        }
        self.start(
            BytesStart::new("LayerFeature")
                .with_attributes([("layerRef", layer_feature.layer_ref.as_str())]),
        )?;
        for feature in layer_feature.features.iter().filter(|f| f.has_geometry()) {
            self.feature_set(feature, &layer_feature.color_ref)?;
        }
        self.end("LayerFeature")
    }

    fn feature_set(&mut self, feature: &Feature, color_ref: &str) -> Result<()> {
        let mut set = BytesStart::new("Set");
        if !feature.net().is_empty() {
            set.push_attribute(("net", feature.net()));
        }
        match feature {
            Feature::Pad(pad) => {
                set.push_attribute(("padUsage", if pad.via { "VIA" } else { "TERMINATION" }));
                set.push_attribute(("geometry", pad.padstack_def_ref.as_str()));
            }
            Feature::Polygon { .. } | Feature::Path { .. } | Feature::Drill(_) => {}
        }
        self.start(set)?;
        self.empty_with("ColorRef", "id", color_ref)?;

        match feature {
            Feature::Polygon { polygon, .. } => {
                self.start(BytesStart::new("Features"))?;
                self.contour(polygon)?;
                self.end("Features")?;
            }
            Feature::Path { polyline, .. } => {
                self.start(BytesStart::new("Features"))?;
                self.polygon_chain("Polyline", &polyline.chain, Some(&polyline.line_desc_ref))?;
                self.end("Features")?;
            }
            Feature::Pad(pad) => {
                self.start(
                    BytesStart::new("Pad")
                        .with_attributes([("padstackDefRef", pad.padstack_def_ref.as_str())]),
                )?;
                self.xform(&pad.xform)?;
                self.location(pad.location.x, pad.location.y)?;
                self.empty_with("StandardPrimitiveRef", "id", &pad.primitive_ref)?;
                if let Some(pin_ref) = &pad.pin_ref {
                    self.pin_ref(pin_ref)?;
                }
                self.end("Pad")?;
            }
            Feature::Drill(hole) => {
                let mut elem = BytesStart::new("Hole");
                elem.push_attribute(("name", hole.name.as_str()));
                elem.push_attribute(("diameter", self.len(hole.diameter).as_str()));
                elem.push_attribute(("platingStatus", hole.plating_status.as_str()));
                elem.push_attribute(("plusTol", self.len(hole.plus_tol).as_str()));
                elem.push_attribute(("minusTol", self.len(hole.minus_tol).as_str()));
                elem.push_attribute(("x", self.len(hole.location.x).as_str()));
                elem.push_attribute(("y", self.len(hole.location.y).as_str()));
                self.empty(elem)?;
            }
        }

        self.end("Set")
    }
}
