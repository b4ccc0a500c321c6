//! 页面渲染
//!
//! 首页为登记表单，列表页为患者表格。页面自包含，不依赖静态文件目录。

use std::fmt::Write;

use clinic_core::Patient;

/// 页面渲染能力
pub trait PageRenderer: Send + Sync {
    /// 首页
    fn index(&self) -> String;

    /// 患者列表页
    fn patients(&self, patients: &[Patient]) -> String;
}

/// 内置HTML页面
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlPages;

const STYLE: &str = r#"
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: #f4f6fb;
            color: #333;
        }
        .container { max-width: 1100px; margin: 0 auto; padding: 24px; }
        .header { margin-bottom: 24px; }
        .header h1 { font-size: 2rem; color: #2d3a8c; }
        .card { background: white; border-radius: 8px; padding: 20px; box-shadow: 0 2px 8px rgba(0,0,0,0.08); }
        form label { display: block; margin-top: 12px; font-weight: 600; }
        form input, form textarea, form select { width: 100%; padding: 8px; margin-top: 4px; border: 1px solid #ccd; border-radius: 4px; }
        button { margin-top: 16px; padding: 8px 16px; border: none; border-radius: 4px; background: #2d3a8c; color: white; cursor: pointer; }
        button.danger { background: #c0392b; margin-top: 0; }
        table { width: 100%; border-collapse: collapse; }
        th, td { text-align: left; padding: 8px; border-bottom: 1px solid #e3e6ef; vertical-align: top; }
        #status { margin-top: 12px; }
        a { color: #2d3a8c; }
"#;

const INDEX_BODY: &str = r#"
    <div class="container">
        <header class="header">
            <h1>Patient Intake</h1>
            <p><a href="/view_patients">View all patients</a></p>
        </header>

        <div class="card">
            <form id="patient-form">
                <label for="name">Name</label>
                <input id="name" name="name" required>

                <label for="age">Age</label>
                <input id="age" name="age" type="number" min="0" required>

                <label for="gender">Gender</label>
                <select id="gender" name="gender" required>
                    <option value="">Select</option>
                    <option value="M">Male</option>
                    <option value="F">Female</option>
                    <option value="O">Other</option>
                </select>

                <label for="contact_number">Contact number</label>
                <input id="contact_number" name="contact_number" required>

                <label for="address">Address</label>
                <input id="address" name="address" required>

                <label for="medicalHistory">Medical history</label>
                <textarea id="medicalHistory" name="medicalHistory" rows="3" required></textarea>

                <label for="admissionDate">Admission date</label>
                <input id="admissionDate" name="admissionDate" type="date" required>

                <button type="submit">Add patient</button>
            </form>
            <p id="status"></p>
        </div>
    </div>

    <script>
        document.getElementById('patient-form').addEventListener('submit', async function (event) {
            event.preventDefault();
            const payload = Object.fromEntries(new FormData(this).entries());
            const status = document.getElementById('status');
            try {
                const response = await fetch('/add_patient', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify(payload)
                });
                const data = await response.json();
                status.textContent = data.message;
                if (response.ok) {
                    this.reset();
                }
            } catch (error) {
                status.textContent = 'Failed to add patient! ' + error;
            }
        });
    </script>
"#;

const PATIENTS_SCRIPT: &str = r#"
    <script>
        document.querySelectorAll('button[data-delete]').forEach(function (button) {
            button.addEventListener('click', async function () {
                const id = this.getAttribute('data-delete');
                const response = await fetch('/delete_patient/' + id, { method: 'DELETE' });
                const data = await response.json();
                if (response.ok) {
                    document.querySelector('tr[data-patient-id="' + id + '"]').remove();
                }
                alert(data.message);
            });
        });
    </script>
"#;

impl PageRenderer for HtmlPages {
    fn index(&self) -> String {
        layout("Patient Intake", INDEX_BODY)
    }

    fn patients(&self, patients: &[Patient]) -> String {
        let mut body = String::from(
            r#"
    <div class="container">
        <header class="header">
            <h1>Patients</h1>
            <p><a href="/">Add a patient</a></p>
        </header>

        <div class="card">
"#,
        );

        if patients.is_empty() {
            body.push_str("            <p>No patients recorded.</p>\n");
        } else {
            body.push_str(
                r#"            <table>
                <thead>
                    <tr><th>ID</th><th>Name</th><th>Age</th><th>Gender</th><th>Contact</th><th>Address</th><th>Medical history</th><th>Admission date</th><th></th></tr>
                </thead>
                <tbody>
"#,
            );
            for patient in patients {
                // String 写入不会失败
                let _ = writeln!(
                    body,
                    r#"                    <tr data-patient-id="{id}"><td>{id}</td><td>{name}</td><td>{age}</td><td>{gender}</td><td>{contact}</td><td>{address}</td><td>{history}</td><td>{date}</td><td><button class="danger" data-delete="{id}">Delete</button></td></tr>"#,
                    id = patient.id,
                    name = escape_html(&patient.name),
                    age = patient.age,
                    gender = escape_html(&patient.gender),
                    contact = escape_html(&patient.contact_number),
                    address = escape_html(&patient.address),
                    history = escape_html(&patient.medical_history),
                    date = patient.admission_date.format("%Y-%m-%d"),
                );
            }
            body.push_str("                </tbody>\n            </table>\n");
        }

        body.push_str("        </div>\n    </div>\n");
        body.push_str(PATIENTS_SCRIPT);

        layout("Patients", &body)
    }
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{style}    </style>
</head>
<body>{body}</body>
</html>
"#,
        title = escape_html(title),
        style = STYLE,
        body = body,
    )
}

/// 转义HTML特殊字符
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn patient(id: i64, name: &str) -> Patient {
        Patient {
            id,
            name: name.to_string(),
            age: 34,
            gender: "F".to_string(),
            contact_number: "555-0100".to_string(),
            address: "12 Elm St".to_string(),
            medical_history: "asthma".to_string(),
            admission_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_patients_page_has_one_row_per_record() {
        let html = HtmlPages.patients(&[patient(1, "Jane Doe"), patient(2, "John <Roe>")]);

        assert_eq!(html.matches("<tr data-patient-id=").count(), 2);
        assert!(html.contains("Jane Doe"));
        assert!(html.contains("John &lt;Roe&gt;"));
        assert!(html.contains("2024-01-05"));
    }

    #[test]
    fn test_empty_patients_page() {
        let html = HtmlPages.patients(&[]);
        assert!(html.contains("No patients recorded."));
        assert_eq!(html.matches("<tr data-patient-id=").count(), 0);
    }

    #[test]
    fn test_index_posts_to_add_patient() {
        let html = HtmlPages.index();
        assert!(html.contains("/add_patient"));
        assert!(html.contains(r#"name="medicalHistory""#));
    }
}
