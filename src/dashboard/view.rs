//! 看板 HTML 渲染
//!
//! - render_shell: 完整页面 (月份选择、搜索框、内容占位)
//! - render_content: 内容片段 (统计卡片、图表、交易表格、分页)
//! - render_fragment: 内容片段 + 带外更新的表单状态

use super::state::{Action, DashboardState, Phase};
use crate::models::{ListingPage, Month, ProductSummary};
use serde_json::json;

const PIE_COLORS: [&str; 5] = ["#0093E9", "#9ACD32", "#FFCE56", "#FF6384", "#36A2EB"];

/// 基础 HTML 模板
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ display: none; }}
        .htmx-request .htmx-indicator, .htmx-request.htmx-indicator {{ display: flex; }}
        .htmx-request #dashboard {{ opacity: 0.3; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    <main class="max-w-6xl mx-auto p-6">{}</main>
</body>
</html>"#,
        escape_html(title),
        content
    )
}

/// 完整页面, 内容区加载后通过 htmx 拉取
pub fn render_shell(state: &DashboardState) -> String {
    let key = state.listing_key();
    let month_options: String = Month::all()
        .map(|month| {
            format!(
                "<option value='{}'{}>{}</option>",
                month.number(),
                if month == state.month() { " selected" } else { "" },
                month.name()
            )
        })
        .collect();

    let content = format!(
        r#"<form id='dashboard-controls' class='flex items-center justify-between mb-4'
            hx-get='/dashboard/content' hx-target='#dashboard' hx-sync='this:replace' hx-indicator='#dashboard-spinner'>
            <h2 class='text-2xl font-bold'>Transactions Dashboard</h2>
            <div class='flex gap-2'>
                <input type='text' name='search' value='{}' placeholder='Search...'
                    hx-get='/dashboard/content' hx-trigger='keyup changed delay:300ms' hx-include='#dashboard-controls'
                    hx-target='#dashboard' hx-sync='#dashboard-controls:replace' hx-indicator='#dashboard-spinner'
                    class='px-4 py-2 border rounded-lg w-48'>
                <select name='month' hx-get='/dashboard/content' hx-trigger='change' hx-include='#dashboard-controls'
                    hx-target='#dashboard' hx-sync='#dashboard-controls:replace' hx-indicator='#dashboard-spinner'
                    class='px-4 py-2 border rounded-lg'>{}</select>
                <input type='hidden' name='limit' value='{}'>
                {}
            </div>
        </form>
        <div id='dashboard-spinner' class='htmx-indicator justify-center py-2 text-gray-500'>Loading...</div>
        <div id='dashboard' hx-get='/dashboard/content?{}' hx-trigger='load'>{}</div>"#,
        escape_html(state.search()),
        month_options,
        key.limit,
        render_state_inputs(state, false),
        key.query_string(),
        render_content(state)
    );

    base_html("Transactions Dashboard", &content)
}

/// 表单中记录当前页与上一次的月份/搜索, 服务端据此判断是否重置页码
pub fn render_state_inputs(state: &DashboardState, oob: bool) -> String {
    format!(
        "<div id='dashboard-state'{}><input type='hidden' name='page' value='{}'><input type='hidden' name='prev_month' value='{}'><input type='hidden' name='prev_search' value='{}'></div>",
        if oob { " hx-swap-oob='true'" } else { "" },
        state.page(),
        state.month(),
        escape_html(state.search())
    )
}

/// htmx 响应: 内容 + 表单状态
pub fn render_fragment(state: &DashboardState) -> String {
    format!("{}{}", render_content(state), render_state_inputs(state, true))
}

/// 内容片段: 加载中 / 失败提示 / 完整数据, 三者互斥
pub fn render_content(state: &DashboardState) -> String {
    match state.phase() {
        Phase::Loading => render_loading(),
        Phase::Failed(message) => render_error(message),
        Phase::Ready { listing, summary } => format!(
            "{}{}{}",
            render_stat_cards(summary),
            render_charts(summary),
            render_table(state, listing)
        ),
    }
}

fn render_loading() -> String {
    r#"<div class='flex justify-center py-16' role='status'>
        <div class='h-10 w-10 border-4 border-indigo-500 border-t-transparent rounded-full animate-spin'></div>
        <span class='sr-only'>Loading...</span>
    </div>"#
        .to_string()
}

fn render_error(message: &str) -> String {
    tracing::debug!("rendering dashboard error: {}", message);
    r#"<div class='bg-red-50 border border-red-200 text-red-700 p-4 rounded-lg' role='alert'>
        <h4 class='font-bold'>Failed to fetch products.</h4>
    </div>"#
        .to_string()
}

fn render_stat_cards(summary: &ProductSummary) -> String {
    let stats = &summary.product_stats;
    let card = |label: &str, value: String| {
        format!(
            "<div class='bg-white p-4 rounded-xl shadow-sm text-center'><p class='text-lg text-gray-600'>{}</p><p class='text-2xl font-bold'>{}</p></div>",
            label,
            escape_html(&value)
        )
    };
    format!(
        "<div class='grid grid-cols-3 gap-4 mb-6'>{}{}{}</div>",
        card("Total Sale", stats.total_sales_amount.clone()),
        card("Total Sold Item", stats.total_sold_items.to_string()),
        card("Total Not Sold Item", stats.total_not_sold_items.to_string())
    )
}

fn render_charts(summary: &ProductSummary) -> String {
    let pie = json!({
        "type": "pie",
        "data": {
            "labels": summary.categories.iter().map(|c| c.category.as_str()).collect::<Vec<_>>(),
            "datasets": [{
                "data": summary.categories.iter().map(|c| c.count).collect::<Vec<_>>(),
                "backgroundColor": PIE_COLORS,
                "hoverBackgroundColor": PIE_COLORS,
            }],
        },
    });
    let bar = json!({
        "type": "bar",
        "data": {
            "labels": summary.total_sales.iter().map(|(label, _)| label).collect::<Vec<_>>(),
            "datasets": [{
                "label": "Total Sales",
                "data": summary.total_sales.iter().map(|(_, count)| count).collect::<Vec<_>>(),
                "backgroundColor": "rgba(75, 192, 192, 0.2)",
                "borderColor": "rgba(75, 192, 192, 1)",
                "borderWidth": 1,
            }],
        },
        "options": { "scales": { "y": { "beginAtZero": true } } },
    });

    format!(
        r#"<div class='grid grid-cols-2 gap-4 mb-6'>
            <div class='bg-white p-4 rounded-xl shadow-sm'>
                <h3 class='text-xl font-bold mb-2'>Category Distribution</h3>
                <div class='mx-auto' style='height: 300px; width: 300px'><canvas id='category-chart'></canvas></div>
            </div>
            <div class='bg-white p-4 rounded-xl shadow-sm'>
                <h3 class='text-xl font-bold mb-2'>Total Sales Distribution</h3>
                <canvas id='sales-chart'></canvas>
            </div>
        </div>
        <script>
            new Chart(document.getElementById('category-chart'), {});
            new Chart(document.getElementById('sales-chart'), {});
        </script>"#,
        script_json(&pie),
        script_json(&bar)
    )
}

fn render_table(state: &DashboardState, listing: &ListingPage) -> String {
    let rows: String = listing
        .products
        .iter()
        .map(|p| {
            format!(
                "<tr class='border-t'><td class='p-2'>{}</td><td class='p-2'>{}</td><td class='p-2'>{}</td><td class='p-2'>{}</td><td class='p-2'><img alt='' src='{}' width='50'></td></tr>",
                p.id,
                escape_html(&p.title),
                p.price,
                escape_html(&p.category),
                escape_html(&p.image)
            )
        })
        .collect();

    format!(
        r#"<div class='bg-white p-4 rounded-xl shadow-sm'>
            <h3 class='text-xl font-bold mb-2'>Transactions Table</h3>
            <table class='w-full text-left'>
                <thead><tr><th class='p-2'>Id</th><th class='p-2'>Title</th><th class='p-2'>Price</th><th class='p-2'>Category</th><th class='p-2'>Image</th></tr></thead>
                <tbody>{}</tbody>
            </table>
            <div class='flex items-center justify-between mt-3'>
                <p>Total Records : {}</p>
                {}
            </div>
        </div>"#,
        rows,
        listing.total,
        render_pagination(state, listing.total_pages)
    )
}

/// 分页: 首页 / 上一页 / 页码 / 下一页 / 末页
fn render_pagination(state: &DashboardState, total_pages: i64) -> String {
    let current = state.page();
    let last = total_pages.clamp(0, u32::MAX as i64) as u32;

    let link = |label: String, target: u32, disabled: bool, active: bool| {
        if disabled || active {
            let class = if active { "bg-indigo-600 text-white" } else { "text-gray-400" };
            return format!("<span class='px-2 py-1 border rounded {}'>{}</span>", class, label);
        }
        let query = state
            .apply(Action::GoToPage(target))
            .state
            .listing_key()
            .query_string();
        format!(
            "<a class='px-2 py-1 border rounded hover:bg-gray-100' href='/?{q}' hx-get='/dashboard/content?{q}' hx-target='#dashboard' hx-sync='#dashboard-controls:replace' hx-indicator='#dashboard-spinner'>{}</a>",
            label,
            q = escape_html(&query)
        )
    };

    let at_start = current <= 1;
    let at_end = current >= last;
    let mut items = vec![
        link("&laquo;".to_string(), 1, at_start, false),
        link("&lsaquo;".to_string(), current.saturating_sub(1), at_start, false),
    ];
    items.extend((1..=last).map(|page| link(page.to_string(), page, false, page == current)));
    items.push(link("&rsaquo;".to_string(), current + 1, at_end, false));
    items.push(link("&raquo;".to_string(), last, at_end, false));

    format!("<nav class='flex gap-1 text-sm'>{}</nav>", items.concat())
}

/// 嵌入 <script> 的 JSON, 防止提前闭合标签
fn script_json(value: &serde_json::Value) -> String {
    value.to_string().replace("</", "<\\/")
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
