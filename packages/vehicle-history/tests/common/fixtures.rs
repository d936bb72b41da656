//! HTML fixtures, one per supported layout.
//!
//! The AutoCheck full report and the Carfax classic report describe the
//! same vehicle so they can be merged end to end.

pub const HONDA_VIN: &str = "1HGCV1F34JA123456";
pub const TOYOTA_VIN: &str = "2T1BURHE0JC074159";
pub const CAMRY_VIN: &str = "4T1G11AK5LU123456";

pub const AUTOCHECK_FULL_REPORT: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>AutoCheck Vehicle History Report</title>
  <meta name="description" content="Experian AutoCheck vehicle history report">
</head>
<body id="fastLinkFullReport">
  <img class="logo" src="https://www.autocheck.com/members/images/experian-autocheck-logo.png" alt="AutoCheck">
  <div class="vehicle-info">
    <h1 class="vehicle-ymm">2018 HONDA ACCORD EX-L</h1>
    <div class="vin">VIN: <span data-vin="1HGCV1F34JA123456">1HGCV1F34JA123456</span></div>
    <div class="vehicle-spec"><span class="label">Body Style:</span> <span>Sedan 4D</span></div>
    <div class="vehicle-spec"><span class="label">Engine:</span> <span>1.5L I4 Turbo</span></div>
  </div>
  <div class="report-date">Report Run Date: 01/20/2024</div>
  <div class="summary">
    <div class="summary-item">Owners: 3</div>
    <div class="summary-item">Open Recalls: 1</div>
  </div>
  <ul class="title-brands"><li class="title-brand">Salvage</li></ul>
  <table class="problem-check">
    <tr><td>Total Loss</td><td>Problem Reported</td></tr>
    <tr><td>Odometer Check</td><td>No Problem</td></tr>
  </table>
  <div class="history-records">
    <div class="history-record" data-owner="1">
      <span class="record-date">06/15/2023</span>
      <span class="record-location">Durham, NC</span>
      <span class="record-odometer">41,200</span>
      <span class="record-source">Police Report</span>
      <span class="record-details">Accident reported - collision with another vehicle</span>
    </div>
    <div class="history-record" data-owner="3">
      <span class="record-date">01/10/2024</span>
      <span class="record-location">Raleigh, NC</span>
      <span class="record-odometer">50,100</span>
      <span class="record-source">Service Record</span>
      <span class="record-details">Oil change performed</span>
    </div>
    <div class="history-record" data-owner="3">
      <span class="record-date">01/18/2024</span>
      <span class="record-location">Raleigh, NC</span>
      <span class="record-odometer">50,300</span>
      <span class="record-source">Motor Vehicle Dept.</span>
      <span class="record-details">Title issued - salvage brand</span>
    </div>
  </div>
  <div class="accident-records">
    <div class="accident-record">
      <span class="accident-date">06/15/2023</span>
      <span class="accident-type">Collision with another vehicle</span>
      <span class="accident-severity">Moderate</span>
    </div>
  </div>
</body>
</html>"#;

pub const AUTOCHECK_LEGACY: &str = r#"<html>
<head><title>AutoCheck Vehicle History Report</title></head>
<body>
  <img src="/images/autocheck_logo.gif">
  <table class="vehicle-summary">
    <tr><td>VIN:</td><td>2T1BURHE0JC074159</td></tr>
    <tr><td>Year/Make/Model:</td><td>2018 TOYOTA COROLLA LE</td></tr>
    <tr><td>Owners:</td><td>2</td></tr>
  </table>
  <table class="history-table">
    <tr><th>Date</th><th>Location</th><th>Odometer</th><th>Data Source</th><th>Details</th></tr>
    <tr><td colspan="5">Owner 1</td></tr>
    <tr><td>03/02/2018</td><td>Austin, TX</td><td>12</td><td>Texas DMV</td><td>Title issued - new vehicle</td></tr>
    <tr><td colspan="5">Owner 2</td></tr>
    <tr><td>05/20/2021</td><td>Dallas, TX</td><td>38,900</td><td>Service Record</td><td>Brakes replaced</td></tr>
    <tr><td>Unknown</td><td>Dallas, TX</td><td></td><td>Auction</td><td>Vehicle sold</td></tr>
  </table>
</body>
</html>"#;

pub const CARFAX_CLASSIC: &str = r#"<html>
<head><title>CARFAX Vehicle History Report for this 2018 HONDA ACCORD EX-L</title></head>
<body>
  <img src="https://media.carfax.com/img/vhr/cfx_logo.png">
  <div id="headerMakeModelYear">2018 HONDA ACCORD EX-L</div>
  <div id="headerVin">VIN: 1HGCV1F34JA123456</div>
  <table id="summaryTable">
    <tr><td>Previous owners</td><td>2</td></tr>
    <tr><td>Accidents reported</td><td>1</td></tr>
    <tr><td>Last reported odometer</td><td>50,150 mi</td></tr>
    <tr><td>Open recalls</td><td>0</td></tr>
  </table>
  <table id="detailedHistory">
    <tr><th>Date</th><th>Mileage</th><th>Source</th><th>Comments</th></tr>
    <tr class="owner-header"><td colspan="4">Owner 1</td></tr>
    <tr><td>06/15/2023</td><td>41,200</td><td>Police Report<br>Durham, NC</td><td>Accident reported<br>Minor damage</td></tr>
    <tr class="owner-header"><td colspan="4">Owner 2</td></tr>
    <tr><td>01/12/2024</td><td>50,150</td><td>Service facility<br>Raleigh, NC</td><td>Oil and filter changed<br>Tires rotated</td></tr>
    <tr><td>01/25/2024</td><td>Not reported</td><td>North Carolina Motor Vehicle Dept.<br>Raleigh, NC</td><td>Registration renewed</td></tr>
  </table>
  <table id="accidentTable">
    <tr><th>Date</th><th>Type</th><th>Severity</th></tr>
    <tr><td>06/15/2023</td><td>Collision with another vehicle</td><td>Minor damage</td></tr>
  </table>
</body>
</html>"#;

pub const CARFAX_MODERN: &str = r#"<html>
<head><title>CARFAX Vehicle History Report</title></head>
<body>
  <header class="vehicle-header">
    <h1>2020 TOYOTA CAMRY SE</h1>
    <span class="vin" data-vin="4T1G11AK5LU123456">VIN 4T1G11AK5LU123456</span>
  </header>
  <div class="owner-section" data-owner="1">
    <div class="record-card">
      <span class="record-date">Mar 3, 2020</span>
      <span class="record-odometer">15 mi</span>
      <span class="record-source">Toyota of Orlando</span>
      <span class="record-location">Orlando, FL</span>
      <ul class="record-comments"><li>Vehicle sold</li><li>Title issued or updated</li></ul>
    </div>
  </div>
  <div class="owner-section" data-owner="2">
    <div class="record-card">
      <span class="record-date">Aug 22, 2022</span>
      <span class="record-odometer">31,004 mi</span>
      <span class="record-source">Jiffy Lube</span>
      <span class="record-location">Tampa, FL</span>
      <ul class="record-comments"><li>Oil and filter changed</li></ul>
    </div>
  </div>
  <section class="accident-section"><p>No accidents reported</p></section>
</body>
</html>"#;

pub const CARFAX_REACT: &str = r#"<html>
<head>
  <title data-react-helmet="true">CARFAX Vehicle History Report - 2018 HONDA ACCORD</title>
  <meta data-react-helmet="true" name="description" content="CARFAX Vehicle History Report">
</head>
<body>
  <div id="root"></div>
  <script id="__CARFAX_REPORT_STATE__" type="application/json">
  {
    "vehicle": {"vin": "1HGCV1F34JA123456", "year": 2018, "make": "HONDA", "model": "ACCORD", "trim": "EX-L", "bodyStyle": "Sedan 4D"},
    "reportDate": "2024-01-20",
    "summary": {"ownerCount": 2, "accidentCount": 1, "totalLoss": false, "odometerProblem": false, "titleBrands": [], "openRecallCount": 0},
    "ownershipHistory": [
      {"ownerNumber": 1, "records": [
        {"date": "2023-06-15", "odometer": 41200, "source": "Police Report", "location": "Durham, NC", "comments": ["Accident reported", "Minor damage"]}
      ]},
      {"ownerNumber": 2, "records": [
        {"date": "2024-01-12", "odometer": "50,150", "source": "Service facility", "location": "Raleigh, NC", "comments": ["Oil and filter changed"]}
      ]}
    ],
    "accidents": [{"date": "2023-06-15", "type": "Collision with another vehicle", "severity": "Minor"}]
  }
  </script>
</body>
</html>"#;

/// React shell whose embedded state is unreadable; the rendered cards are
/// still present.
pub const CARFAX_REACT_BROKEN_STATE: &str = r#"<html>
<head><title data-react-helmet="true">CARFAX Vehicle History Report</title></head>
<body>
  <span class="vin" data-vin="4T1G11AK5LU123456"></span>
  <h1 class="vehicle-title">2020 TOYOTA CAMRY SE</h1>
  <script id="__CARFAX_REPORT_STATE__" type="application/json">{"vehicle": </script>
  <div class="owner-section" data-owner="1">
    <div class="record-card">
      <span class="record-date">Mar 3, 2020</span>
      <span class="record-source">Toyota of Orlando</span>
      <span class="record-location">Orlando, FL</span>
      <span class="record-details">Vehicle sold</span>
    </div>
  </div>
</body>
</html>"#;

pub const UNRELATED_PAGE: &str = r#"<html>
<head><title>Used cars for sale near you</title></head>
<body><h1>Find your next car</h1><p>Browse thousands of listings.</p></body>
</html>"#;
