use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

/// Column start positions of the generated report table.
const COLUMNS: [i64; 5] = [50, 170, 260, 340, 420];

/// ToUnicode CMap mapping the two-byte codes `0x1020..=0x107E` to ASCII.
const TO_UNICODE_CMAP: &[u8] = b"/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo
<< /Registry (Adobe)
/Ordering (UCS)
/Supplement 0
>> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
1 beginbfrange
<1020> <107E> <0020>
endbfrange
endcmap
CMapName currentdict /CMap defineresource pop
end
end";

/// Font the generated text is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// Type1 Helvetica, one byte per character.
    Simple,

    /// Type0 font with Identity-H encoding and a ToUnicode CMap; every
    /// character is drawn as the two-byte code `0x10, c`.
    Cid,
}

/// Text items of one page: `(x, y, text)`.
pub type PageItems = Vec<(i64, i64, String)>;

/// Build a one-page PDF that draws each `(x, y, text)` with its own text object.
pub fn pdf_with_text(items: &[(i64, i64, String)]) -> Vec<u8> {
    pdf_with_pages(&[items.to_vec()], Font::Simple)
}

/// Build a PDF with one page per entry of `pages`.
pub fn pdf_with_pages(pages: &[PageItems], font: Font) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = match font {
        Font::Simple => doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        }),
        Font::Cid => {
            let cmap_id = doc.add_object(Stream::new(dictionary! {}, TO_UNICODE_CMAP.to_vec()));
            doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type0",
                "BaseFont" => "Arial",
                "Encoding" => "Identity-H",
                "ToUnicode" => cmap_id,
            })
        }
    };
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for items in pages {
        let content = Content {
            operations: page_operations(items, font),
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save pdf");
    bytes
}

fn page_operations(items: &[(i64, i64, String)], font: Font) -> Vec<Operation> {
    let mut operations = Vec::new();
    for (x, y, text) in items {
        let operand = match font {
            Font::Simple => Object::string_literal(text.as_str()),
            Font::Cid => Object::String(
                text.bytes().flat_map(|b| [0x10, b]).collect(),
                StringFormat::Hexadecimal,
            ),
        };
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
        operations.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
        operations.push(Operation::new("Tj", vec![operand]));
        operations.push(Operation::new("ET", vec![]));
    }
    operations
}

/// Items of a water-quality report page: a heading, then an 18-row table
/// whose metric rows (2, 11..=17) carry `values` in column 4.
pub fn report_items(values: [&str; 8]) -> PageItems {
    let metric_rows = [2, 11, 12, 13, 14, 15, 16, 17];
    let mut items = vec![(50, 800, "Trinkwasseranalyse".to_string())];

    let header = ["Parameter", "Einheit", "GW", "BG", "Wert"];
    for (x, text) in COLUMNS.iter().zip(header) {
        items.push((*x, 760, text.to_string()));
    }

    for row in 1..18 {
        let y = 760 - 20 * row as i64;
        let value = metric_rows
            .iter()
            .position(|r| *r == row)
            .map_or("-", |i| values[i]);
        let cells = [format!("Param {row}"), "mg/l".to_string(), "50".to_string(), "0,1".to_string(), value.to_string()];
        for (x, text) in COLUMNS.iter().zip(cells) {
            items.push((*x, y, text));
        }
    }

    items
}

/// Build a one-page water-quality report.
pub fn report_pdf(values: [&str; 8]) -> Vec<u8> {
    pdf_with_text(&report_items(values))
}

/// Build the report with a two-part letterhead line above the heading.
pub fn letterhead_report_pdf(values: [&str; 8]) -> Vec<u8> {
    let mut items = vec![
        (50, 820, "LWG Lausitzer Wasser GmbH & Co. KG".to_string()),
        (450, 820, "Stand 01/2024".to_string()),
    ];
    items.extend(report_items(values));
    pdf_with_text(&items)
}

/// Items of a page with running text only.
pub fn prose_items() -> PageItems {
    vec![
        (50, 800, "Sehr geehrte Kundinnen und Kunden,".to_string()),
        (50, 780, "die Analyse wird nachgereicht.".to_string()),
    ]
}

/// Build a PDF with running text only.
pub fn prose_pdf() -> Vec<u8> {
    pdf_with_text(&prose_items())
}
