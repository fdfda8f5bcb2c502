//! KML 2.2 rendering of a built `Document`. Two-space indentation, every text and
//! attribute value escaped.

use crate::document::{Document, Folder, Placemark, Schema};
use std::io::{self, Write};

const KML_NS: &str = "http://www.opengis.net/kml/2.2";

pub fn write_kml<W: Write>(doc: &Document, w: &mut W) -> io::Result<()> {
    writeln!(w, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(w, r#"<kml xmlns="{KML_NS}">"#)?;
    writeln!(w, "  <Document>")?;
    write_schema(&doc.schema, w)?;
    for folder in &doc.folders {
        write_folder(folder, &doc.schema.id, w)?;
    }
    writeln!(w, "  </Document>")?;
    writeln!(w, "</kml>")?;
    Ok(())
}

pub fn render_kml(doc: &Document) -> String {
    let mut buf = Vec::with_capacity(4096 + doc.placemark_count() * 512);
    // Writing into a Vec cannot fail.
    let _ = write_kml(doc, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

fn write_schema<W: Write>(schema: &Schema, w: &mut W) -> io::Result<()> {
    writeln!(w, r#"    <Schema id="{}" name="{}">"#, escape(&schema.id), escape(&schema.name))?;
    for f in &schema.fields {
        writeln!(w, r#"      <SimpleField name="{}" type="{}"></SimpleField>"#, escape(&f.name), escape(&f.kind))?;
    }
    writeln!(w, "    </Schema>")
}

fn write_folder<W: Write>(folder: &Folder, schema_id: &str, w: &mut W) -> io::Result<()> {
    writeln!(w, "    <Folder>")?;
    writeln!(w, "      <name>{}</name>", escape(&folder.name))?;
    for p in &folder.placemarks {
        write_placemark(p, schema_id, w)?;
    }
    writeln!(w, "    </Folder>")
}

fn write_placemark<W: Write>(p: &Placemark, schema_id: &str, w: &mut W) -> io::Result<()> {
    writeln!(w, "      <Placemark>")?;
    writeln!(w, "        <name>{}</name>", escape(&p.name))?;
    writeln!(w, "        <description>{}</description>", escape(&p.description))?;
    writeln!(w, "        <ExtendedData>")?;
    writeln!(w, r##"          <SchemaData schemaUrl="#{}">"##, escape(schema_id))?;
    let m = &p.metadata;
    simple_data(w, "visit_count", &m.visit_count.to_string())?;
    simple_data(w, "last_visit_unix", &m.last_visit_unix.to_string())?;
    simple_data(w, "visit_timestamps_unix", &m.visit_timestamps_unix)?;
    writeln!(w, "          </SchemaData>")?;
    writeln!(w, "        </ExtendedData>")?;
    writeln!(w, "        <Point>")?;
    writeln!(w, "          <coordinates>{},{}</coordinates>", p.point.lon, p.point.lat)?;
    writeln!(w, "        </Point>")?;
    writeln!(w, "      </Placemark>")
}

fn simple_data<W: Write>(w: &mut W, name: &str, value: &str) -> io::Result<()> {
    writeln!(w, r#"            <SimpleData name="{}">{}</SimpleData>"#, escape(name), escape(value))
}

/// XML text/attribute escaping.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
