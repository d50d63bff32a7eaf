use capflow_cap::parser::parse_document;
use capflow_cap::values::{parse_circle, parse_polygon};
use capflow_cap::Diagnostics;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

// Example CAP messages for benchmarking
const SIMPLE_ALERT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<alert xmlns="urn:oasis:names:tc:emergency:cap:1.2">
  <identifier>BENCH-SIMPLE</identifier>
  <sender>bench@capflow</sender>
  <sent>2011-05-09T18:00:00-07:00</sent>
  <status>Actual</status>
  <msgType>Alert</msgType>
  <scope>Public</scope>
  <info>
    <category>Met</category>
    <event>TORNADO WARNING</event>
    <urgency>Immediate</urgency>
    <severity>Extreme</severity>
    <certainty>Observed</certainty>
  </info>
</alert>"#;

const COMPLEX_ALERT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<alert xmlns="urn:oasis:names:tc:emergency:cap:1.2">
  <identifier>BENCH-COMPLEX</identifier>
  <sender>bench@capflow</sender>
  <sent>2011-05-09T18:00:00-07:00</sent>
  <status>Actual</status>
  <msgType>Update</msgType>
  <scope>Public</scope>
  <references>bench@capflow,BENCH-SIMPLE,2011-05-09T17:00:00-07:00</references>
  <info>
    <language>en-US</language>
    <category>Met</category>
    <category>Safety</category>
    <event>FLASH FLOOD WARNING</event>
    <responseType>Avoid</responseType>
    <urgency>Expected</urgency>
    <severity>Severe</severity>
    <certainty>Likely</certainty>
    <eventCode>
      <valueName>SAME</valueName>
      <value>FFW</value>
    </eventCode>
    <parameter>
      <valueName>VTEC</valueName>
      <value>/O.NEW.KSTO.FF.W.0015.110509T1800Z-110510T0000Z/</value>
    </parameter>
    <headline>FLASH FLOOD WARNING FOR YOLO COUNTY</headline>
    <description>Heavy rainfall upstream will produce rapid rises on small creeks.</description>
    <instruction>Move to higher ground immediately.</instruction>
    <resource>
      <resourceDesc>radar snapshot</resourceDesc>
      <mimeType>image/png</mimeType>
      <size>204800</size>
      <uri>http://bench.example.org/radar.png</uri>
    </resource>
    <area>
      <areaDesc>Yolo County</areaDesc>
      <polygon>38.0,-121.0 38.1,-121.1 38.2,-121.2 38.3,-121.0 38.0,-121.0</polygon>
      <circle>38.15,-121.1 12.5</circle>
      <geocode>
        <valueName>SAME</valueName>
        <value>006113</value>
      </geocode>
      <altitude>0</altitude>
      <ceiling>10000</ceiling>
    </area>
  </info>
</alert>"#;

fn bench_document_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_document");
    group.bench_function("simple", |b| {
        b.iter(|| parse_document(black_box(SIMPLE_ALERT)))
    });
    group.bench_function("complex", |b| {
        b.iter(|| parse_document(black_box(COMPLEX_ALERT)))
    });
    group.finish();
}

fn bench_value_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("values");
    group.bench_function("polygon", |b| {
        b.iter(|| {
            parse_polygon(black_box(
                "38.0,-121.0 38.1,-121.1 38.2,-121.2 38.3,-121.0 38.0,-121.0",
            ))
        })
    });
    group.bench_function("circle", |b| {
        b.iter(|| {
            let mut diags = Diagnostics::new();
            parse_circle(black_box("38.15,-121.1 12.5"), &mut diags)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_document_parsing, bench_value_parsing);
criterion_main!(benches);
