//! Third-party styles and scripts loaded by the HTML page.
//!
//! Bootstrap for layout and DataTables for sorting, filtering and export
//! buttons. URLs are emitted verbatim; nothing here is fetched.

/// Stylesheets linked in the page head.
pub const STYLESHEETS: &[&str] = &[
    "https://maxcdn.bootstrapcdn.com/bootstrap/3.3.7/css/bootstrap.min.css",
    "https://cdn.datatables.net/1.10.21/css/jquery.dataTables.min.css",
    "https://cdn.datatables.net/buttons/1.6.2/css/buttons.dataTables.min.css",
];

/// Scripts loaded at the end of the body, in dependency order.
pub const SCRIPTS: &[&str] = &[
    "//cdnjs.cloudflare.com/ajax/libs/jquery/3.5.1/jquery.min.js",
    "//cdnjs.cloudflare.com/ajax/libs/twitter-bootstrap/3.3.7/js/bootstrap.min.js",
    "//cdn.datatables.net/1.10.21/js/jquery.dataTables.min.js",
    "//cdn.datatables.net/buttons/1.6.2/js/dataTables.buttons.min.js",
    "//cdn.datatables.net/buttons/1.6.2/js/buttons.flash.min.js",
    "//cdn.datatables.net/buttons/1.6.2/js/buttons.print.min.js",
    "//cdn.datatables.net/buttons/1.6.2/js/buttons.html5.min.js",
    "//cdnjs.cloudflare.com/ajax/libs/jszip/3.1.3/jszip.min.js",
    "//cdnjs.cloudflare.com/ajax/libs/pdfmake/0.1.62/pdfmake.min.js",
    "//cdnjs.cloudflare.com/ajax/libs/pdfmake/0.1.62/vfs_fonts.js",
];

/// Turns `#tbl` into a DataTable with a search input in every footer cell.
const INIT_SCRIPT: &str = r#"<script type='text/javascript'>
$(document).ready(function () {
	// Setup - add a text input to each footer cell
	$('#tbl tfoot th').each(function () {
		$(this).html('<input type="text" placeholder="Search" />');
	});

	$('#tbl').DataTable({
		'scrollY': '60vh',
		'scrollX': '100%',
		'scrollCollapse': true,
		'info': true,
		'fixedHeader': true,
		'dom': 'Bfrtip',
		'buttons': ['copy', 'csv', 'excel', 'print'],
		'lengthMenu': [
			[25, 50, 100, 500, -1],
			[25, 50, 100, 500, 'All']
		]
	});

	// Apply the search
	var tbl = $('#tbl').DataTable();
	tbl.columns().every(function () {
		var that = this;
		$('input', this.footer()).on('keyup change', function () {
			if (that.search() !== this.value) {
				that.search(this.value).draw();
			}
		});
	});
});
</script>"#;

/// `<link>` tags for the page head.
pub fn stylesheet_links() -> String {
    let mut out = String::new();
    for href in STYLESHEETS {
        out.push_str("<link rel='stylesheet' href='");
        out.push_str(href);
        out.push_str("' media='screen' />\n");
    }
    out
}

/// `<script>` tags plus the table initialisation.
pub fn script_tags() -> String {
    let mut out = String::new();
    for src in SCRIPTS {
        out.push_str("<script type='text/javascript' src='");
        out.push_str(src);
        out.push_str("'></script>\n");
    }
    out.push_str(INIT_SCRIPT);
    out
}
