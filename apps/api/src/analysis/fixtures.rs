//! Minimal single-page PDFs for extraction and upload tests.

/// Builds a one-page PDF showing each line in Helvetica. Lines must not
/// contain parentheses or backslashes.
pub fn pdf_with_lines(lines: &[&str]) -> Vec<u8> {
    let mut content = String::from("BT\n/F1 11 Tf\n14 TL\n72 720 Td\n");
    for line in lines {
        content.push_str(&format!("({line}) Tj T*\n"));
    }
    content.push_str("ET\n");

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
         /Resources << /Font << /F1 5 0 R >> >> >>"
            .to_string(),
        format!("<< /Length {} >>\nstream\n{content}endstream", content.len()),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }

    let xref_at = pdf.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
        objects.len() + 1
    ));
    pdf.extend_from_slice(xref.as_bytes());
    pdf
}

/// Resume-shaped lines, comfortably above the minimum text length.
pub const RESUME_LINES: [&str; 8] = [
    "Jane Doe - Software Engineer",
    "Education: B.Sc. Computer Science, State University, 2016-2020",
    "Experience: Backend Engineer at Acme Corp, 2020-2024",
    "Built payment services in Rust and Go, cut p99 latency by 40 percent",
    "Projects: open-source JSON repair library, log analysis CLI",
    "Skills: Rust, Go, PostgreSQL, Kubernetes, AWS",
    "Achievements: speaker at RustConf 2023",
    "Mentored four junior engineers through onboarding",
];
