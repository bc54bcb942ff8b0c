//! Server rendered pages.

pub struct ReadingRow {
    pub value: String,
    pub timestamp: String,
}

pub struct DeviceChoice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

pub struct DeviceCard {
    pub sensor_id: String,
    pub value: String,
    pub timestamp: String,
    pub total: String,
    pub error: Option<String>,
}

markup::define! {
    Head<'a>(page_title: &'a str) {
        head {
            title { @page_title }
            meta[charset = "utf-8"];
            meta[name = "viewport", content = "width=device-width, initial-scale=1"];
            link[rel = "stylesheet", href = "https://cdnjs.cloudflare.com/ajax/libs/bulma/0.9.4/css/bulma.min.css"];
        }
    }

    SensorPage<'a>(sensor_id: &'a str, rows: &'a [ReadingRow], chart: &'a str) {
        @markup::doctype()
        html[lang = "en"] {
            @Head { page_title: "Sensor readings" }
            body {
                section.section {
                    div.container {
                        h1.title { "Sensor " @sensor_id }
                        h2.subtitle."is-6" { "Latest readings, oldest first" }
                        @if rows.is_empty() {
                            p { "No readings yet." }
                        } else {
                            div[id = "chart"] {}
                            table.table."is-striped"."is-fullwidth" {
                                thead {
                                    tr { th { "Timestamp" } th { "Value" } }
                                }
                                tbody {
                                    @for row in rows.iter() {
                                        tr {
                                            td { @row.timestamp }
                                            td { @row.value }
                                        }
                                    }
                                }
                            }
                            script[src = "https://cdn.plot.ly/plotly-2.35.2.min.js"] {}
                            script { @markup::raw(chart) }
                        }
                    }
                }
            }
        }
    }

    Dashboard<'a>(choices: &'a [DeviceChoice], cards: &'a [DeviceCard]) {
        @markup::doctype()
        html[lang = "en"] {
            @Head { page_title: "IoT Dashboard" }
            body {
                section.section {
                    div.container {
                        h1.title { "IoT Dashboard" }
                        form[method = "get", action = "/dashboard"] {
                            div.field."has-addons" {
                                div.control {
                                    div.select {
                                        select[name = "device_id"] {
                                            @for choice in choices.iter() {
                                                @if choice.selected {
                                                    option[value = choice.value.as_str(), selected = "selected"] { @choice.label }
                                                } else {
                                                    option[value = choice.value.as_str()] { @choice.label }
                                                }
                                            }
                                        }
                                    }
                                }
                                div.control {
                                    button.button."is-info"["type" = "submit"] { "Show" }
                                }
                            }
                        }
                        @if cards.is_empty() {
                            p { "No device data to show." }
                        }
                        div.columns."is-multiline" {
                            @for card in cards.iter() {
                                div.column."is-4" {
                                    div.box {
                                        h2.subtitle { "Device " @card.sensor_id }
                                        @if let Some(error) = &card.error {
                                            p."has-text-danger" { @error }
                                        } else {
                                            p.title { @card.value }
                                            p { "Last reading: " @card.timestamp }
                                            p { "Total readings: " @card.total }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    ErrorFragment<'a>(message: &'a str) {
        h3 { "Error: " @message }
    }
}
